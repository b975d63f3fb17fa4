//! Integration tests for the SMTP backend
//!
//! Runs the backend against a scripted in-process SMTP server speaking
//! plaintext, so every protocol stage and its failure mapping can be checked
//! without a real relay.

use std::io::{BufRead, BufReader, Write};
use std::net::{TcpListener, TcpStream};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use lettre::transport::smtp::extension::ClientId;
use mdmail::config::{SmtpConfig, SmtpSecurity};
use mdmail::email::{EmailRequest, MailError, MailSender, SmtpBackend, Stylesheet};

/// Replies the fake server gives at the interesting stages
#[derive(Clone, Copy)]
struct Script {
    auth: &'static str,
    rcpt: &'static str,
}

impl Script {
    const ACCEPT_ALL: Self = Self {
        auth: "235 2.7.0 Authentication successful\r\n",
        rcpt: "250 2.1.5 OK\r\n",
    };
}

/// What the fake server saw during the session
#[derive(Debug, Default)]
struct Transcript {
    commands: Vec<String>,
    data: String,
}

impl Transcript {
    fn verbs(&self) -> Vec<&str> {
        self.commands
            .iter()
            .map(|line| line.split_whitespace().next().unwrap_or_default())
            .collect()
    }
}

/// Start a one-shot SMTP server and return its port
fn spawn_server(script: Script) -> (u16, JoinHandle<Transcript>) {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();

    let handle = thread::spawn(move || {
        let (stream, _) = listener.accept().unwrap();
        serve(stream, script)
    });

    (port, handle)
}

fn serve(stream: TcpStream, script: Script) -> Transcript {
    stream
        .set_read_timeout(Some(Duration::from_secs(5)))
        .unwrap();
    let mut writer = stream.try_clone().unwrap();
    let mut reader = BufReader::new(stream);
    let mut transcript = Transcript::default();

    writer.write_all(b"220 mdmail.test ESMTP ready\r\n").unwrap();

    loop {
        let mut line = String::new();
        match reader.read_line(&mut line) {
            Ok(0) | Err(_) => break,
            Ok(_) => {}
        }

        let command = line.trim_end().to_string();
        let verb = command
            .split_whitespace()
            .next()
            .unwrap_or_default()
            .to_ascii_uppercase();
        transcript.commands.push(command);

        let reply: &str = match verb.as_str() {
            "EHLO" => "250-mdmail.test\r\n250-AUTH PLAIN LOGIN\r\n250 8BITMIME\r\n",
            "AUTH" => script.auth,
            "MAIL" => "250 2.1.0 OK\r\n",
            "RCPT" => script.rcpt,
            "DATA" => {
                writer.write_all(b"354 End data with <CR><LF>.<CR><LF>\r\n").unwrap();
                loop {
                    let mut data_line = String::new();
                    if reader.read_line(&mut data_line).unwrap_or(0) == 0 {
                        return transcript;
                    }
                    if data_line == ".\r\n" {
                        break;
                    }
                    transcript.data.push_str(&data_line);
                }
                "250 2.0.0 Queued\r\n"
            }
            "QUIT" => {
                let _ = writer.write_all(b"221 2.0.0 Bye\r\n");
                break;
            }
            _ => "502 5.5.2 Command not recognized\r\n",
        };

        if writer.write_all(reply.as_bytes()).is_err() {
            break;
        }
    }

    transcript
}

fn backend(port: u16) -> SmtpBackend {
    let config = SmtpConfig::new("127.0.0.1", "mailer", "secret", "sender@example.com")
        .with_port(port)
        .with_security(SmtpSecurity::None)
        .with_timeout(Duration::from_secs(5));

    SmtpBackend::new(config).with_hello_name(ClientId::Domain("client.mdmail.test".to_string()))
}

fn sender(port: u16) -> MailSender<SmtpBackend> {
    MailSender::new(
        "sender@example.com",
        Stylesheet::inline("h1 { color: #222; }"),
        backend(port),
    )
}

fn request() -> EmailRequest {
    EmailRequest::new(
        "recipient@example.com",
        "Weekly notes",
        "# Notes\n\n- first\n- second\n\n> quoted",
    )
}

#[test]
fn test_successful_session_ends_with_quit() {
    let (port, server) = spawn_server(Script::ACCEPT_ALL);

    sender(port).send(&request()).unwrap();

    let transcript = server.join().unwrap();
    assert_eq!(
        transcript.verbs(),
        vec!["EHLO", "AUTH", "MAIL", "RCPT", "DATA", "QUIT"]
    );
    assert!(transcript.commands[0].contains("client.mdmail.test"));
    assert!(transcript.commands[2].contains("<sender@example.com>"));
    assert!(transcript.commands[3].contains("<recipient@example.com>"));

    assert!(transcript.data.contains("From: sender@example.com\r\n"));
    assert!(transcript.data.contains("To: recipient@example.com\r\n"));
    assert!(transcript.data.contains("Subject: Weekly notes\r\n"));
    assert!(transcript.data.contains("Content-Type: multipart/alternative"));
    assert_eq!(transcript.data.matches("Content-Type: text/html").count(), 1);
}

#[test]
fn test_rejected_login_is_auth_error() {
    let (port, server) = spawn_server(Script {
        auth: "535 5.7.8 Authentication credentials invalid\r\n",
        ..Script::ACCEPT_ALL
    });

    let err = sender(port).send(&request()).unwrap_err();
    assert!(matches!(err, MailError::Auth(_)), "got {err:?}");

    let transcript = server.join().unwrap();
    let verbs = transcript.verbs();
    assert!(!verbs.contains(&"MAIL"));
    assert_eq!(verbs.last(), Some(&"QUIT"));
}

#[test]
fn test_rejected_recipient_is_delivery_error() {
    let (port, server) = spawn_server(Script {
        rcpt: "550 5.1.1 No such user\r\n",
        ..Script::ACCEPT_ALL
    });

    let err = sender(port).send(&request()).unwrap_err();
    assert!(matches!(err, MailError::Delivery(ref msg) if msg.contains("No such user")), "got {err:?}");

    let transcript = server.join().unwrap();
    let verbs = transcript.verbs();
    assert!(verbs.contains(&"RCPT"));
    assert!(!verbs.contains(&"DATA"));
}

#[test]
fn test_unparseable_reply_is_transport_error() {
    let (port, server) = spawn_server(Script {
        rcpt: "garbled reply\r\n",
        ..Script::ACCEPT_ALL
    });

    let err = sender(port).send(&request()).unwrap_err();
    assert!(matches!(err, MailError::Transport(_)), "got {err:?}");

    let transcript = server.join().unwrap();
    assert!(!transcript.verbs().contains(&"DATA"));
}

#[test]
fn test_starttls_unsupported_is_transport_error() {
    let (port, server) = spawn_server(Script::ACCEPT_ALL);

    let config = SmtpConfig::new("127.0.0.1", "mailer", "secret", "sender@example.com")
        .with_port(port)
        .with_security(SmtpSecurity::StartTls)
        .with_timeout(Duration::from_secs(5));
    let backend =
        SmtpBackend::new(config).with_hello_name(ClientId::Domain("client.mdmail.test".to_string()));
    let sender = MailSender::new(
        "sender@example.com",
        Stylesheet::inline(""),
        backend,
    );

    let err = sender.send(&request()).unwrap_err();
    assert!(matches!(err, MailError::Transport(_)), "got {err:?}");

    // Credentials must never be sent over the unencrypted connection.
    let transcript = server.join().unwrap();
    assert!(!transcript.verbs().contains(&"AUTH"));
}
