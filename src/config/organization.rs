//! Organization details printed on every receipt.
//!
//! The defaults are the church's own details, so a missing `[organization]`
//! table in config.toml still produces complete receipts.

use serde::Deserialize;

/// Static header and footer text of a receipt
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Organization {
    /// Name in the receipt header (e.g. "SOURCE OF DELIVERANCE CHURCH")
    pub name: String,
    /// Postal address line
    pub address: String,
    /// Phone number
    pub phone: String,
    /// Contact email
    pub email: String,
    /// Thank-you line in the footer
    pub thanks: String,
    /// Blessing line in the footer
    pub blessing: String,
    /// Scripture quotation closing every receipt
    pub scripture: String,
}

impl Default for Organization {
    fn default() -> Self {
        Self {
            name: "SOURCE OF DELIVERANCE CHURCH".to_string(),
            address: "123 Faith Avenue, Hope City, HC 12345".to_string(),
            phone: "(555) 123-4567".to_string(),
            email: "info@sourceofdeliverance.org".to_string(),
            thanks: "Thank you for your generous contribution to Source of Deliverance Church."
                .to_string(),
            blessing: "May God bless you abundantly!".to_string(),
            scripture: "\"Give, and it will be given to you. A good measure, pressed down, \
                        shaken together and running over\" - Luke 6:38"
                .to_string(),
        }
    }
}

impl Organization {
    /// "Phone: ... | Email: ..." line under the header
    #[must_use]
    pub fn contact_line(&self) -> String {
        format!("Phone: {} | Email: {}", self.phone, self.email)
    }

    /// Footer line telling members who to call about a transaction
    #[must_use]
    pub fn questions_line(&self) -> String {
        format!(
            "For any questions regarding this transaction, please contact us at {}",
            self.phone
        )
    }

    /// Footer line marking the document as an official receipt
    #[must_use]
    pub fn official_line(&self) -> String {
        format!("This is an official receipt from {}", title_case(&self.name))
    }
}

/// "SOURCE OF DELIVERANCE CHURCH" -> "Source Of Deliverance Church", with
/// short joining words kept lowercase.
fn title_case(name: &str) -> String {
    name.split_whitespace()
        .enumerate()
        .map(|(i, word)| {
            let lower = word.to_lowercase();
            if i > 0 && matches!(lower.as_str(), "of" | "the" | "and") {
                return lower;
            }
            let mut chars = lower.chars();
            chars.next().map_or_else(String::new, |first| {
                first.to_uppercase().chain(chars).collect()
            })
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_footer_lines() {
        let org = Organization::default();
        assert_eq!(
            org.contact_line(),
            "Phone: (555) 123-4567 | Email: info@sourceofdeliverance.org"
        );
        assert_eq!(
            org.official_line(),
            "This is an official receipt from Source of Deliverance Church"
        );
        assert!(org.scripture.ends_with("- Luke 6:38"));
    }

    #[test]
    fn test_partial_organization_table_keeps_defaults() {
        let org: Organization = toml::from_str(r#"phone = "(555) 000-0000""#)
            .unwrap_or_default();
        assert_eq!(org.phone, "(555) 000-0000");
        assert_eq!(org.name, "SOURCE OF DELIVERANCE CHURCH");
    }
}
