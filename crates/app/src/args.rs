use std::fmt;
use std::str::FromStr;

use peerpilot_core::model::{
    GradeBand, QuizSlug, ResourceFilter, ResourceId, ResourceType, SessionFilter, SessionId,
    SessionKind, SessionRequestDraft, SessionRequestId, Topic, TutorId,
};
use services::{AuthState, ClearTarget, Student};

const DEFAULT_DB_URL: &str = "sqlite://peerpilot.sqlite3";

#[derive(Debug)]
pub enum ArgsError {
    MissingValue { flag: &'static str },
    MissingArgument { what: &'static str },
    UnknownArg(String),
    UnknownCommand(String),
    InvalidValue { flag: &'static str, raw: String },
    InvalidDbUrl { raw: String },
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::MissingArgument { what } => write!(f, "missing {what}"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::UnknownCommand(cmd) => write!(f, "unknown subcommand: {cmd}"),
            ArgsError::InvalidValue { flag, raw } => write!(f, "invalid {flag} value: {raw}"),
            ArgsError::InvalidDbUrl { raw } => write!(f, "invalid --db value: {raw}"),
        }
    }
}

impl std::error::Error for ArgsError {}

fn require_value(
    args: &mut impl Iterator<Item = String>,
    flag: &'static str,
) -> Result<String, ArgsError> {
    args.next().ok_or(ArgsError::MissingValue { flag })
}

fn parse_value<T: FromStr>(
    args: &mut impl Iterator<Item = String>,
    flag: &'static str,
) -> Result<T, ArgsError> {
    let raw = require_value(args, flag)?;
    raw.parse().map_err(|_| ArgsError::InvalidValue { flag, raw })
}

pub fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  app [--db <sqlite_url> | --no-storage] [--as <name>] [--email <addr>] <command>");
    eprintln!();
    eprintln!("Commands:");
    eprintln!("  quizzes                         list quizzes");
    eprintln!("  take <slug>                     take a quiz interactively");
    eprintln!("  resources [--topic T] [--type T] [--grade G] [--query Q]");
    eprintln!("  saved                           list saved resources");
    eprintln!("  save <resource-id>              toggle a saved resource");
    eprintln!("  schedule [--type T] [--level L] list scheduled sessions");
    eprintln!("  rsvp <session-id>               toggle an RSVP");
    eprintln!("  tutors [--topic T]              list tutors");
    eprintln!("  request --tutor <id> --goal G --duration D --day D --time T [--topic T] [--note N]");
    eprintln!("  requests                        list session requests");
    eprintln!("  cancel <request-id>             remove a session request");
    eprintln!("  dashboard                       personal overview");
    eprintln!("  metrics                         scores and recent attempts");
    eprintln!("  clear <attempts|rsvps|saved|requests|all>");
    eprintln!();
    eprintln!("Defaults:");
    eprintln!("  --db {DEFAULT_DB_URL}");
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  PEERPILOT_DB_URL, PEERPILOT_STUDENT_NAME, PEERPILOT_STUDENT_EMAIL");
    eprintln!("  RESEND_API_KEY, TUTOR_EMAIL, PEERPILOT_MAIL_FROM, PEERPILOT_MAIL_BASE_URL");
    eprintln!("  RUST_LOG");
}

/// Request fields as typed on the command line. The tutor name and default
/// topic are filled in from the catalog before validation.
#[derive(Debug, Clone)]
pub struct RequestArgs {
    pub tutor: TutorId,
    pub draft: SessionRequestDraft,
}

#[derive(Debug, Clone)]
pub enum Command {
    Help,
    Quizzes,
    Take(QuizSlug),
    Resources(ResourceFilter),
    Saved,
    Save(ResourceId),
    Schedule(SessionFilter),
    Rsvp(SessionId),
    Tutors(Option<Topic>),
    Request(RequestArgs),
    Requests,
    Cancel(SessionRequestId),
    Dashboard,
    Metrics,
    Clear(ClearTarget),
}

#[derive(Debug)]
pub struct Args {
    /// `None` runs without persistent storage.
    pub db_url: Option<String>,
    pub auth: AuthState,
    pub command: Command,
}

impl Args {
    pub fn parse(args: impl IntoIterator<Item = String>) -> Result<Self, ArgsError> {
        let mut db_url = Some(
            std::env::var("PEERPILOT_DB_URL")
                .ok()
                .map_or_else(|| DEFAULT_DB_URL.into(), normalize_sqlite_url),
        );
        let mut name = std::env::var("PEERPILOT_STUDENT_NAME").ok();
        let mut email = std::env::var("PEERPILOT_STUDENT_EMAIL").ok();

        let mut args = args.into_iter();
        let mut rest = Vec::new();
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--db" => {
                    let value = require_value(&mut args, "--db")?;
                    if value.trim().is_empty() {
                        return Err(ArgsError::InvalidDbUrl { raw: value });
                    }
                    db_url = Some(normalize_sqlite_url(value));
                }
                "--no-storage" => db_url = None,
                "--as" => name = Some(require_value(&mut args, "--as")?),
                "--email" => email = Some(require_value(&mut args, "--email")?),
                _ => rest.push(arg),
            }
        }

        let auth = match name.filter(|name| !name.trim().is_empty()) {
            Some(name) => AuthState::SignedIn(Student::new(name.trim(), email)),
            None => AuthState::SignedOut,
        };
        let command = Command::parse(rest.into_iter())?;
        Ok(Self {
            db_url,
            auth,
            command,
        })
    }
}

impl Command {
    fn parse(mut args: impl Iterator<Item = String>) -> Result<Self, ArgsError> {
        let Some(name) = args.next() else {
            return Ok(Self::Help);
        };
        let command = match name.as_str() {
            "--help" | "-h" | "help" => Self::Help,
            "quizzes" => Self::Quizzes,
            "take" => Self::Take(QuizSlug::new(positional(&mut args, "quiz slug")?)),
            "resources" => Self::Resources(parse_resource_filter(&mut args)?),
            "saved" => Self::Saved,
            "save" => Self::Save(ResourceId::new(positional(&mut args, "resource id")?)),
            "schedule" => Self::Schedule(parse_session_filter(&mut args)?),
            "rsvp" => Self::Rsvp(SessionId::new(positional(&mut args, "session id")?)),
            "tutors" => Self::Tutors(parse_topic_only(&mut args)?),
            "request" => Self::Request(parse_request(&mut args)?),
            "requests" => Self::Requests,
            "cancel" => Self::Cancel(SessionRequestId::new(positional(&mut args, "request id")?)),
            "dashboard" => Self::Dashboard,
            "metrics" => Self::Metrics,
            "clear" => Self::Clear(parse_clear_target(&positional(&mut args, "clear target")?)?),
            _ => return Err(ArgsError::UnknownCommand(name)),
        };
        if let Some(extra) = args.next() {
            return Err(ArgsError::UnknownArg(extra));
        }
        Ok(command)
    }
}

fn positional(
    args: &mut impl Iterator<Item = String>,
    what: &'static str,
) -> Result<String, ArgsError> {
    args.next()
        .filter(|value| !value.trim().is_empty() && !value.starts_with("--"))
        .ok_or(ArgsError::MissingArgument { what })
}

fn parse_resource_filter(
    args: &mut impl Iterator<Item = String>,
) -> Result<ResourceFilter, ArgsError> {
    let mut filter = ResourceFilter::default();
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--topic" => filter.topic = Some(parse_value::<Topic>(args, "--topic")?),
            "--type" => filter.kind = Some(parse_value::<ResourceType>(args, "--type")?),
            "--grade" => filter.grade = Some(parse_value::<GradeBand>(args, "--grade")?),
            "--query" => filter.query = Some(require_value(args, "--query")?),
            _ => return Err(ArgsError::UnknownArg(arg)),
        }
    }
    Ok(filter)
}

fn parse_session_filter(
    args: &mut impl Iterator<Item = String>,
) -> Result<SessionFilter, ArgsError> {
    let mut filter = SessionFilter::default();
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--type" => filter.kind = Some(parse_value::<SessionKind>(args, "--type")?),
            "--level" => filter.level = Some(parse_value::<Topic>(args, "--level")?),
            _ => return Err(ArgsError::UnknownArg(arg)),
        }
    }
    Ok(filter)
}

fn parse_topic_only(args: &mut impl Iterator<Item = String>) -> Result<Option<Topic>, ArgsError> {
    let mut topic = None;
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--topic" => topic = Some(parse_value::<Topic>(args, "--topic")?),
            _ => return Err(ArgsError::UnknownArg(arg)),
        }
    }
    Ok(topic)
}

fn parse_request(args: &mut impl Iterator<Item = String>) -> Result<RequestArgs, ArgsError> {
    let mut tutor = None;
    let mut draft = SessionRequestDraft::new();
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--tutor" => tutor = Some(TutorId::new(require_value(args, "--tutor")?)),
            "--topic" => draft.topic = require_value(args, "--topic")?,
            "--goal" => draft.goal = require_value(args, "--goal")?,
            "--duration" => draft.duration = require_value(args, "--duration")?,
            "--day" => draft.day = require_value(args, "--day")?,
            "--time" => draft.time = require_value(args, "--time")?,
            "--note" => draft.note = Some(require_value(args, "--note")?),
            _ => return Err(ArgsError::UnknownArg(arg)),
        }
    }
    let tutor = tutor.ok_or(ArgsError::MissingValue { flag: "--tutor" })?;
    Ok(RequestArgs { tutor, draft })
}

fn parse_clear_target(raw: &str) -> Result<ClearTarget, ArgsError> {
    match raw {
        "attempts" => Ok(ClearTarget::Attempts),
        "rsvps" => Ok(ClearTarget::Rsvps),
        "saved" => Ok(ClearTarget::SavedResources),
        "requests" => Ok(ClearTarget::SessionRequests),
        "all" => Ok(ClearTarget::All),
        _ => Err(ArgsError::InvalidValue {
            flag: "clear",
            raw: raw.to_string(),
        }),
    }
}

pub fn normalize_sqlite_url(raw: String) -> String {
    if raw == "sqlite::memory:" || raw.starts_with("sqlite://") {
        return raw;
    }

    let trimmed = raw.trim().to_string();
    let path_str = trimmed
        .strip_prefix("sqlite:")
        .unwrap_or(trimmed.as_str())
        .to_string();
    let path = std::path::Path::new(&path_str);
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()
            .unwrap_or_else(|_| std::path::PathBuf::from("."))
            .join(path)
    };
    format!("sqlite://{}", absolute.display())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<Args, ArgsError> {
        Args::parse(args.iter().map(ToString::to_string))
    }

    #[test]
    fn global_flags_anywhere() {
        let args = parse(&["dashboard", "--as", "Maya Chen", "--no-storage"]).unwrap();
        assert!(args.db_url.is_none());
        assert!(matches!(args.command, Command::Dashboard));
        assert_eq!(args.auth.student().map(Student::name), Some("Maya Chen"));
    }

    #[test]
    fn resource_filter_flags() {
        let args = parse(&[
            "resources", "--topic", "geometry", "--type", "practice", "--grade", "10",
        ])
        .unwrap();
        let Command::Resources(filter) = args.command else {
            panic!("expected resources");
        };
        assert_eq!(filter.topic, Some(Topic::Geometry));
        assert_eq!(filter.kind, Some(ResourceType::Practice));
        assert_eq!(filter.grade, Some(GradeBand::Tenth));
    }

    #[test]
    fn clear_needs_known_target() {
        assert!(matches!(
            parse(&["clear", "everything"]),
            Err(ArgsError::InvalidValue { flag: "clear", .. })
        ));
        assert!(matches!(
            parse(&["clear"]),
            Err(ArgsError::MissingArgument { .. })
        ));
    }

    #[test]
    fn unknown_command_is_rejected() {
        assert!(matches!(
            parse(&["fly"]),
            Err(ArgsError::UnknownCommand(cmd)) if cmd == "fly"
        ));
    }

    #[test]
    fn memory_and_explicit_urls_pass_through() {
        assert_eq!(normalize_sqlite_url("sqlite::memory:".into()), "sqlite::memory:");
        assert_eq!(
            normalize_sqlite_url("sqlite:///tmp/pp.sqlite3".into()),
            "sqlite:///tmp/pp.sqlite3"
        );
        assert_eq!(
            normalize_sqlite_url("sqlite:/tmp/pp.sqlite3".into()),
            "sqlite:///tmp/pp.sqlite3"
        );
    }
}
