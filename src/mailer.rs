//! Builds MIME messages from composed emails and hands them to a lettre transport.

use std::fs;
use std::path::{Path, PathBuf};

use clap::ValueEnum;
use lettre::message::header::ContentType;
use lettre::message::{Attachment as MimeAttachment, Mailbox, MultiPart, SinglePart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{Address, FileTransport, Message, SmtpTransport, Transport};

use crate::backends::email::ComposedEmail;
use crate::backends::html::InlineImage;
use crate::errors::MailError;

/// A file attached to every message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attachment {
    pub filename: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl Attachment {
    pub fn load(path: &Path) -> Result<Self, MailError> {
        let bytes = fs::read(path).map_err(|source| MailError::Attachment {
            path: path.to_path_buf(),
            source,
        })?;
        let filename = path
            .file_name()
            .map(|name| name.to_string_lossy().to_string())
            .unwrap_or_else(|| "attachment".to_string());
        log::debug!("Loaded attachment {filename} ({} bytes)", bytes.len());
        Ok(Attachment {
            content_type: content_type_for(path).to_string(),
            filename,
            bytes,
        })
    }
}

fn content_type_for(path: &Path) -> &'static str {
    let extension = path
        .extension()
        .map(|e| e.to_string_lossy().to_ascii_lowercase())
        .unwrap_or_default();
    match extension.as_str() {
        "pdf" => "application/pdf",
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "txt" => "text/plain",
        "csv" => "text/csv",
        "html" | "htm" => "text/html",
        "ics" => "text/calendar",
        "zip" => "application/zip",
        "doc" => "application/msword",
        "docx" => "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
        "xls" => "application/vnd.ms-excel",
        "xlsx" => "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
        "pptx" => "application/vnd.openxmlformats-officedocument.presentationml.presentation",
        _ => "application/octet-stream",
    }
}

fn content_type(value: &str) -> Result<ContentType, MailError> {
    ContentType::parse(value).map_err(|_| MailError::ContentType(value.to_string()))
}

/// Builds the message for one recipient. The HTML part is wrapped in `multipart/related` when
/// it references inline images, and in `multipart/mixed` when there are attachments.
pub fn build_message(
    from: &Mailbox,
    email: &ComposedEmail,
    attachments: &[Attachment],
    inline_images: &[InlineImage],
) -> Result<Message, MailError> {
    let name = Some(email.name.clone()).filter(|name| !name.is_empty());
    let to = Mailbox::new(name, email.to.parse::<Address>()?);
    let builder = Message::builder()
        .from(from.clone())
        .to(to)
        .subject(email.subject.clone());
    let html = SinglePart::html(email.html.clone());

    let message = match (inline_images.is_empty(), attachments.is_empty()) {
        (true, true) => builder.singlepart(html)?,
        (false, true) => builder.multipart(related(html, inline_images)?)?,
        (images_empty, false) => {
            let mut mixed = match images_empty {
                true => MultiPart::mixed().singlepart(html),
                false => MultiPart::mixed().multipart(related(html, inline_images)?),
            };
            for attachment in attachments {
                mixed = mixed.singlepart(
                    MimeAttachment::new(attachment.filename.clone())
                        .body(attachment.bytes.clone(), content_type(&attachment.content_type)?),
                );
            }
            builder.multipart(mixed)?
        }
    };
    Ok(message)
}

fn related(html: SinglePart, inline_images: &[InlineImage]) -> Result<MultiPart, MailError> {
    let mut related = MultiPart::related().singlepart(html);
    for image in inline_images {
        related = related.singlepart(
            MimeAttachment::new_inline(image.content_id.clone())
                .body(image.bytes.clone(), content_type(&image.content_type)?),
        );
    }
    Ok(related)
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, ValueEnum)]
pub enum TlsMode {
    /// Upgrade with STARTTLS (default port 587)
    #[default]
    Starttls,
    /// Implicit TLS (default port 465)
    Tls,
    /// No encryption (default port 25); only for local relays
    #[value(name = "none", alias = "plain")]
    Plain,
}

#[derive(Debug, Clone)]
pub struct SmtpSettings {
    pub host: String,
    pub port: Option<u16>,
    pub tls: TlsMode,
    pub username: Option<String>,
    pub password: Option<String>,
}

/// Where composed messages go
pub enum Outbox {
    Smtp(SmtpTransport),
    /// One `.eml` file per message
    File(FileTransport, PathBuf),
}

impl Outbox {
    pub fn smtp(settings: &SmtpSettings) -> Result<Self, MailError> {
        let mut builder = match settings.tls {
            TlsMode::Starttls => SmtpTransport::starttls_relay(&settings.host)?,
            TlsMode::Tls => SmtpTransport::relay(&settings.host)?,
            TlsMode::Plain => SmtpTransport::builder_dangerous(&settings.host),
        };
        if let Some(port) = settings.port {
            builder = builder.port(port);
        }
        match (&settings.username, &settings.password) {
            (Some(username), Some(password)) => {
                builder = builder.credentials(Credentials::new(username.clone(), password.clone()))
            }
            (Some(_), None) => log::warn!("SMTP user given without a password; not authenticating"),
            _ => {}
        }
        log::debug!("Using SMTP relay {} ({:?})", settings.host, settings.tls);
        Ok(Outbox::Smtp(builder.build()))
    }

    pub fn file(dir: &Path) -> Result<Self, MailError> {
        fs::create_dir_all(dir)?;
        Ok(Outbox::File(FileTransport::new(dir), dir.to_path_buf()))
    }

    pub fn deliver(&self, message: &Message) -> Result<(), MailError> {
        match self {
            Outbox::Smtp(transport) => {
                let response = transport.send(message)?;
                log::debug!("Relay answered {:?}", response.code());
            }
            Outbox::File(transport, dir) => {
                let id = transport.send(message)?;
                log::debug!("Wrote {id}.eml to {dir:?}");
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn composed() -> ComposedEmail {
        ComposedEmail {
            to: "alice@example.com".into(),
            name: "Alice".into(),
            subject: "Interview".into(),
            html: "<b>Hi</b>".into(),
        }
    }

    fn sender() -> Mailbox {
        "Heritage Club <club@example.com>".parse().unwrap()
    }

    fn formatted(message: &Message) -> String {
        String::from_utf8_lossy(&message.formatted()).to_string()
    }

    #[test]
    fn html_only_message() {
        let message = build_message(&sender(), &composed(), &[], &[]).unwrap();
        let raw = formatted(&message);
        assert!(raw.contains("To: Alice <alice@example.com>"));
        assert!(raw.contains("Subject: Interview"));
        assert!(raw.contains("Content-Type: text/html; charset=utf-8"));
        assert!(!raw.contains("multipart/mixed"));
    }

    #[test]
    fn attachments_make_a_mixed_message() {
        let attachment = Attachment {
            filename: "brochure.pdf".into(),
            content_type: "application/pdf".into(),
            bytes: b"%PDF-1.4".to_vec(),
        };
        let message = build_message(&sender(), &composed(), &[attachment], &[]).unwrap();
        let raw = formatted(&message);
        assert!(raw.contains("multipart/mixed"));
        assert!(raw.contains("application/pdf"));
        assert!(raw.contains("brochure.pdf"));
    }

    #[test]
    fn inline_images_make_a_related_message() {
        let image = InlineImage {
            content_id: "image1@docmerge".into(),
            content_type: "image/png".into(),
            bytes: vec![137, 80, 78, 71],
        };
        let message = build_message(&sender(), &composed(), &[], &[image]).unwrap();
        let raw = formatted(&message);
        assert!(raw.contains("multipart/related"));
        assert!(raw.contains("<image1@docmerge>"));
    }

    #[test]
    fn invalid_recipient_address() {
        let mut email = composed();
        email.to = "not an address".into();
        assert!(matches!(
            build_message(&sender(), &email, &[], &[]),
            Err(MailError::Address(_))
        ))
    }

    #[test]
    fn attachment_types_from_extension() {
        assert_eq!(content_type_for(Path::new("attachment.PDF")), "application/pdf");
        assert_eq!(content_type_for(Path::new("notes")), "application/octet-stream");
    }
}
