use std::collections::BTreeMap;

use serde::Serialize;
use tera::{Context, Tera};

use crate::errors::MergeError;
use crate::recipients::Recipient;

static EMAIL_TEMPLATE: &str = include_str!("../../templates/email.html.tera");
pub static DEFAULT_SUBJECT: &str = "Your allocated interview timeslot";

// registered with an `.html` suffix so Tera escapes recipient values
const HTML_TEMPLATE_NAME: &str = "email.html";
const SUBJECT_TEMPLATE_NAME: &str = "subject.txt";

/// A message ready to be handed to the mailer
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct ComposedEmail {
    pub to: String,
    pub name: String,
    pub subject: String,
    pub html: String,
}

#[derive(Serialize)]
struct MergeContext<'a> {
    recipient: &'a BTreeMap<String, String>,
    name: &'a str,
    email: &'a str,
    body: &'a str,
    vars: &'a BTreeMap<String, String>,
    today: String,
}

/// The compiled HTML and subject templates plus the extra variables shared by every recipient
pub struct MergeTemplate {
    tera: Tera,
    vars: BTreeMap<String, String>,
}

impl MergeTemplate {
    /// Compiles the templates; `html_template` replaces the built-in one when given
    pub fn new(
        html_template: Option<&str>,
        subject_template: &str,
        vars: BTreeMap<String, String>,
    ) -> Result<Self, MergeError> {
        let mut tera = Tera::default();
        tera.add_raw_templates(vec![
            (HTML_TEMPLATE_NAME, html_template.unwrap_or(EMAIL_TEMPLATE)),
            (SUBJECT_TEMPLATE_NAME, subject_template),
        ])?;
        Ok(MergeTemplate { tera, vars })
    }

    /// The built-in template with the default subject and no extra variables
    pub fn with_defaults() -> Result<Self, MergeError> {
        Self::new(None, DEFAULT_SUBJECT, BTreeMap::new())
    }

    pub fn render(&self, recipient: &Recipient, body_html: &str) -> Result<ComposedEmail, MergeError> {
        let context = Context::from_serialize(MergeContext {
            recipient: &recipient.fields,
            name: &recipient.name,
            email: &recipient.email,
            body: body_html,
            vars: &self.vars,
            today: chrono::Local::now().format("%d %B %Y").to_string(),
        })?;

        let html = self.tera.render(HTML_TEMPLATE_NAME, &context)?;
        let subject = self.tera.render(SUBJECT_TEMPLATE_NAME, &context)?;
        Ok(ComposedEmail {
            to: recipient.email.clone(),
            name: recipient.name.clone(),
            // a subject must stay on one line
            subject: subject.lines().map(str::trim).collect::<Vec<_>>().join(" ").trim().to_string(),
            html,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn recipient() -> Recipient {
        Recipient {
            row: 2,
            name: "Tan <Wei>".into(),
            email: "wei@example.com".into(),
            fields: BTreeMap::from([
                ("name".to_string(), "Tan <Wei>".to_string()),
                ("email".to_string(), "wei@example.com".to_string()),
                ("time".to_string(), "14:30".to_string()),
            ]),
        }
    }

    #[test]
    fn default_template_reproduces_the_invitation() {
        let template = MergeTemplate::with_defaults().unwrap();
        let email = template
            .render(&recipient(), r#"<span style="">See you!</span><br>"#)
            .unwrap();
        assert_eq!(email.to, "wei@example.com");
        assert_eq!(email.subject, DEFAULT_SUBJECT);
        assert!(email.html.starts_with("Dear Tan &lt;Wei&gt;,<br><br>"));
        assert!(email.html.contains("<b>NTU Heritage Club Recruitment Drive 2024!</b>"));
        assert!(email.html.contains("Date:<b>26th August 2024</b><br>"));
        assert!(email.html.contains("Timeslot:<b>14:30</b><br>"));
        assert!(email.html.contains("Venue: <b> NS TR+3 </b>for registration"));
        assert!(email.html.contains(r#"<span style="">See you!</span><br>"#));
    }

    #[test]
    fn vars_override_event_details() {
        let vars = BTreeMap::from([
            ("venue".to_string(), "LT1".to_string()),
            ("date".to_string(), "1st September 2024".to_string()),
        ]);
        let template =
            MergeTemplate::new(None, "Interview at {{ vars.venue }} for {{ name }}", vars).unwrap();
        let email = template.render(&recipient(), "").unwrap();
        assert!(email.html.contains("Venue: <b> LT1 </b>"));
        assert!(email.html.contains("Date:<b>1st September 2024</b>"));
        // subjects are not html-escaped
        assert_eq!(email.subject, "Interview at LT1 for Tan <Wei>");
    }

    #[test]
    fn custom_template_sees_every_column() {
        let template = MergeTemplate::new(
            Some("{{ recipient.email }} / {{ recipient.time }} / {{ email }}"),
            "{{ name }}\n  again",
            BTreeMap::new(),
        )
        .unwrap();
        let email = template.render(&recipient(), "").unwrap();
        assert_eq!(email.html, "wei@example.com / 14:30 / wei@example.com");
        assert_eq!(email.subject, "Tan <Wei> again");
    }

    #[test]
    fn invalid_template_is_an_error() {
        assert!(MergeTemplate::new(Some("{{ unclosed"), DEFAULT_SUBJECT, BTreeMap::new()).is_err())
    }
}
