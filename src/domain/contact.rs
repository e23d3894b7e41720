//! Contact form messages addressed to the site owner.

use crate::domain::account::EmailAddress;
use crate::domain::foundation::ValidationError;

/// Upper bound on message body length, in characters.
pub const MAX_MESSAGE_LEN: usize = 5000;

/// A validated contact form submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactMessage {
    pub name: String,
    /// Submitter's address; used as reply-to.
    pub email: EmailAddress,
    pub message: String,
}

impl ContactMessage {
    pub fn new(name: &str, email: &str, message: &str) -> Result<Self, ValidationError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ValidationError::empty_field("name"));
        }
        let email = EmailAddress::parse(email)?;
        let message = message.trim();
        if message.is_empty() {
            return Err(ValidationError::empty_field("message"));
        }
        if message.chars().count() > MAX_MESSAGE_LEN {
            return Err(ValidationError::invalid_format(
                "message",
                format!("must be at most {} characters", MAX_MESSAGE_LEN),
            ));
        }

        Ok(Self {
            name: name.to_string(),
            email,
            message: message.to_string(),
        })
    }

    pub fn subject(&self, site_name: &str) -> String {
        format!("{}: New message from {}", site_name, self.name)
    }

    /// HTML body with all submitter input escaped.
    pub fn html_body(&self) -> String {
        format!(
            concat!(
                "<div style=\"font-family: Arial, sans-serif; border: 1px solid #eee; padding: 20px;\">",
                "<h2 style=\"color: #059669;\">New Website Message</h2>",
                "<p><strong>Name:</strong> {}</p>",
                "<p><strong>User Email:</strong> {}</p>",
                "<p><strong>Message:</strong></p>",
                "<p style=\"background: #f4f4f4; padding: 10px;\">{}</p>",
                "</div>"
            ),
            escape_html(&self.name),
            escape_html(self.email.as_str()),
            escape_html(&self.message),
        )
    }
}

fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
