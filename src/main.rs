mod cli;

use anyhow::{Context, Result, bail};
use clap::Parser;
use lettre::message::Mailbox;
use simple_logger::SimpleLogger;
use std::fs;

use docmerge::{
    backends::{
        Backends,
        email::MergeTemplate,
        html::{ImageEmbedding, render_body},
    },
    extract_body,
    mailer::{Attachment, Outbox, SmtpSettings, build_message},
    recipients::{RecipientOptions, read_recipients},
};

use cli::Cli;

fn main() {
    let args = Cli::parse();
    SimpleLogger::new()
        .with_level(args.log_level())
        .with_colors(true)
        .without_timestamps()
        .init()
        .unwrap();

    match run(args) {
        Ok(summary) if summary.failed == 0 => {}
        Ok(summary) => {
            eprintln!("{} of {} emails failed", summary.failed, summary.total());
            std::process::exit(1)
        }
        Err(e) => {
            eprintln!("Error: {:#}", e);
            std::process::exit(1)
        }
    }
}

#[derive(Default)]
struct Summary {
    sent: usize,
    failed: usize,
}

impl Summary {
    fn total(&self) -> usize {
        self.sent + self.failed
    }
}

fn run(args: Cli) -> Result<Summary> {
    let body = extract_body(&args.document)
        .with_context(|| format!("Unable to convert document {:?}", args.document))?;
    if body.is_empty() {
        log::warn!("Document {:?} has no text or images to merge", args.document);
    }

    if args.backend == Backends::Json {
        println!("{}", serde_json::to_string_pretty(&body)?);
        return Ok(Summary::default());
    }

    let embedding = match args.cid_images {
        true => ImageEmbedding::ContentId,
        false => ImageEmbedding::DataUri,
    };
    let rendered = render_body(&body, embedding);

    let recipients = read_recipients(
        &args.recipients,
        &RecipientOptions {
            sheet: args.sheet.clone(),
            name_column: args.name_column.clone(),
            email_column: args.email_column.clone(),
        },
    )
    .with_context(|| format!("Unable to read recipients from {:?}", args.recipients))?;

    let html_template = match &args.template {
        Some(path) => Some(
            fs::read_to_string(path)
                .with_context(|| format!("Unable to read template {:?}", path))?,
        ),
        None => None,
    };
    let template = MergeTemplate::new(html_template.as_deref(), &args.subject, args.vars())?;

    if args.backend == Backends::Preview {
        for recipient in recipients.iter() {
            let email = template.render(recipient, &rendered.html)?;
            println!("To: {} <{}>\nSubject: {}\n\n{}\n", email.name, email.to, email.subject, email.html);
        }
        return Ok(Summary::default());
    }

    let attachments = args
        .attachments
        .iter()
        .map(|path| Attachment::load(path))
        .collect::<Result<Vec<_>, _>>()?;

    let Some(from) = &args.from else {
        bail!("a sender is required to send email; use --from or DOCMERGE_FROM")
    };
    let from: Mailbox = from
        .parse()
        .with_context(|| format!("Invalid sender address {:?}", from))?;

    let outbox = match args.backend {
        Backends::Smtp => {
            let Some(host) = &args.smtp_host else {
                bail!("the smtp backend needs --smtp-host or DOCMERGE_SMTP_HOST")
            };
            Outbox::smtp(&SmtpSettings {
                host: host.clone(),
                port: args.smtp_port,
                tls: args.smtp_tls,
                username: args.smtp_user.clone(),
                password: args.smtp_password.clone(),
            })?
        }
        _ => Outbox::file(&args.out_dir)?,
    };

    let mut summary = Summary::default();
    for recipient in recipients.iter() {
        let delivered = template
            .render(recipient, &rendered.html)
            .map_err(anyhow::Error::from)
            .and_then(|email| {
                Ok(build_message(&from, &email, &attachments, &rendered.inline_images)?)
            })
            .and_then(|message| Ok(outbox.deliver(&message)?));
        match delivered {
            Ok(()) => {
                log::info!("Email sent to {} at {}", recipient.name, recipient.email);
                summary.sent += 1;
            }
            Err(e) => {
                log::error!(
                    "Unable to send to {} at {} (row {}): {:#}",
                    recipient.name,
                    recipient.email,
                    recipient.row,
                    e
                );
                summary.failed += 1;
            }
        }
    }

    match summary.failed {
        0 => println!("All {} emails have been sent.", summary.sent),
        _ => println!("{} emails sent, {} failed.", summary.sent, summary.failed),
    }
    Ok(summary)
}
