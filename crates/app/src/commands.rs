use std::fmt;
use std::io::{self, BufRead, Write};

use peerpilot_core::model::{QuizSlug, ResourceFilter, SessionFilter, SessionRequest, Topic};
use services::metrics::display_score;
use services::{AppServices, AuthState, Gated, NotificationStatus, QuizStep, SavedRequest, Student};
use tokio::task::JoinHandle;

use crate::args::{Command, RequestArgs};

type CommandResult = Result<(), Box<dyn std::error::Error>>;

#[derive(Debug)]
pub enum CommandError {
    SignInRequired,
    NoInput,
}

impl fmt::Display for CommandError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CommandError::SignInRequired => {
                write!(f, "sign in first: pass --as <name> or set PEERPILOT_STUDENT_NAME")
            }
            CommandError::NoInput => write!(f, "input ended before the quiz finished"),
        }
    }
}

impl std::error::Error for CommandError {}

fn signed_in(auth: &AuthState) -> Result<&Student, CommandError> {
    auth.student().ok_or(CommandError::SignInRequired)
}

fn ready<T>(gated: Gated<T>) -> Result<T, CommandError> {
    match gated {
        Gated::Ready(value) => Ok(value),
        Gated::Loading | Gated::SignInRequired => Err(CommandError::SignInRequired),
    }
}

pub async fn execute(app: &AppServices, auth: &AuthState, command: Command) -> CommandResult {
    if !app.storage_available() {
        eprintln!("note: running without storage; nothing will be kept");
    }
    match command {
        Command::Help => {
            crate::args::print_usage();
            Ok(())
        }
        Command::Quizzes => {
            list_quizzes(app);
            Ok(())
        }
        Command::Take(slug) => take_quiz(app, &slug).await,
        Command::Resources(filter) => {
            list_resources(app, &filter).await;
            Ok(())
        }
        Command::Saved => {
            for resource in app.resources().saved_resources().await {
                println!("{:<4} {} ({})", resource.id, resource.title, resource.url);
            }
            Ok(())
        }
        Command::Save(id) => {
            let saved = app.resources().toggle_saved(&id).await?;
            println!("{id}: {}", if saved { "saved" } else { "removed" });
            Ok(())
        }
        Command::Schedule(filter) => {
            list_schedule(app, filter).await;
            Ok(())
        }
        Command::Rsvp(id) => {
            let attending = app.schedule().toggle_rsvp(&id).await?;
            println!("{id}: {}", if attending { "attending" } else { "not attending" });
            Ok(())
        }
        Command::Tutors(topic) => {
            list_tutors(app, topic);
            Ok(())
        }
        Command::Request(request) => submit_request(app, auth, request).await,
        Command::Requests => {
            signed_in(auth)?;
            let requests = app.session_requests().list().await;
            if requests.is_empty() {
                println!("no session requests yet");
            }
            for request in &requests {
                print_request(request);
            }
            Ok(())
        }
        Command::Cancel(id) => {
            signed_in(auth)?;
            let left = app.session_requests().cancel(&id).await;
            println!("{} request(s) remaining", left.len());
            Ok(())
        }
        Command::Dashboard => show_dashboard(app, auth).await,
        Command::Metrics => show_metrics(app, auth).await,
        Command::Clear(target) => {
            signed_in(auth)?;
            app.dashboard().clear(target).await;
            println!("cleared");
            Ok(())
        }
    }
}

fn list_quizzes(app: &AppServices) {
    for quiz in app.quiz_loop().quizzes() {
        println!(
            "{:<18} {} [{}] {} questions",
            quiz.slug(),
            quiz.title(),
            quiz.topic(),
            quiz.len()
        );
    }
}

async fn take_quiz(app: &AppServices, slug: &QuizSlug) -> CommandResult {
    let quiz_loop = app.quiz_loop();
    let mut session = quiz_loop.start(slug)?;
    println!("{}", session.quiz().title());

    loop {
        let progress = session.progress();
        let Some(question) = session.current_question().cloned() else {
            break;
        };
        println!();
        println!("{} ({}%)", progress.label(), progress.percent());
        println!("{}", question.prompt());
        for (i, choice) in question.choices().iter().enumerate() {
            println!("  {}) {choice}", i + 1);
        }

        loop {
            print!("> ");
            io::stdout().flush()?;
            let line = read_answer(&mut io::stdin().lock())?.ok_or(CommandError::NoInput)?;
            let picked = line
                .trim()
                .parse::<usize>()
                .ok()
                .and_then(|n| n.checked_sub(1));
            match picked.map(|choice| session.select_choice(choice)) {
                Some(Ok(())) => break,
                Some(Err(err)) => println!("{err}"),
                None => println!("enter a number from 1 to {}", question.choices().len()),
            }
        }

        let feedback = session.check_answer()?;
        if feedback.is_correct {
            println!("Correct!");
        } else {
            println!(
                "Not quite. Answer: {}",
                question
                    .choices()
                    .get(feedback.correct_index)
                    .map_or("", String::as_str)
            );
        }
        println!("{}", feedback.explanation);

        if let QuizStep::Completed(attempt) = quiz_loop.advance(&mut session).await? {
            println!();
            println!(
                "Done: {}/{} correct ({}%)",
                attempt.correct(),
                attempt.total(),
                attempt.score_percent()
            );
        }
    }
    Ok(())
}

/// One line of input, or `None` at end of input.
fn read_answer(input: &mut impl BufRead) -> io::Result<Option<String>> {
    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line))
}

async fn list_resources(app: &AppServices, filter: &ResourceFilter) {
    let listings = app.resources().search(filter).await;
    if listings.is_empty() {
        println!("no resources match");
    }
    for listing in listings {
        let resource = &listing.resource;
        println!(
            "{} {:<4} {} [{} · {} · grade {}]",
            if listing.saved { "★" } else { " " },
            resource.id,
            resource.title,
            resource.topic,
            resource.kind.label(),
            resource.grade
        );
    }
}

async fn list_schedule(app: &AppServices, filter: SessionFilter) {
    for listing in app.schedule().sessions(filter).await {
        let session = &listing.session;
        println!(
            "{} {:<4} {} [{} · {}] {} {} @ {} ({}/{} spots left)",
            if listing.attending { "✓" } else { " " },
            session.id,
            session.title,
            session.kind,
            session.level,
            session.day,
            session.time,
            session.location,
            session.spots_left,
            session.spots_total
        );
    }
}

fn list_tutors(app: &AppServices, topic: Option<Topic>) {
    for tutor in app.schedule().tutors(topic) {
        let topics: Vec<_> = tutor.topics.iter().map(|topic| topic.label()).collect();
        println!("{:<16} {}: {}", tutor.id, tutor.name, tutor.headline);
        println!("                 {} | {}", topics.join(", "), tutor.availability);
    }
}

async fn submit_request(app: &AppServices, auth: &AuthState, request: RequestArgs) -> CommandResult {
    let student = signed_in(auth)?;
    let (saved, notification) = start_request(app, student, request).await?;
    println!("saved request {}", saved.request.id());
    io::stdout().flush()?;

    let status = notification.await?;
    println!("tutor notification: {status:?}");
    Ok(())
}

/// Validate and store the request, leaving the tutor notification running
/// on its own task.
async fn start_request(
    app: &AppServices,
    student: &Student,
    request: RequestArgs,
) -> Result<(SavedRequest, JoinHandle<NotificationStatus>), Box<dyn std::error::Error>> {
    let RequestArgs { tutor, mut draft } = request;
    let tutor = app.schedule().tutor(&tutor)?;
    draft.tutor_id = tutor.id.to_string();
    draft.tutor_name = tutor.name.clone();
    if draft.topic.trim().is_empty() {
        if let Some(topic) = tutor.topics.first() {
            draft.topic = topic.label().to_string();
        }
    }
    let details = draft.validate()?;
    Ok(app.session_requests().submit_detached(student, details).await)
}

fn print_request(request: &SessionRequest) {
    let details = request.details();
    println!(
        "{} {} with {}: {} ({}, {} @ {})",
        request.id(),
        details.topic(),
        details.tutor_name(),
        details.goal(),
        details.duration(),
        details.day(),
        details.time()
    );
    if let Some(note) = details.note() {
        println!("    note: {note}");
    }
}

async fn show_dashboard(app: &AppServices, auth: &AuthState) -> CommandResult {
    let snapshot = ready(app.dashboard().dashboard(auth).await)?;
    println!("Hi, {}!", snapshot.greeting_name);
    println!(
        "{} attempts · {} RSVPs · {} saved · {} requests",
        snapshot.counts.attempts,
        snapshot.counts.rsvps,
        snapshot.counts.saved_resources,
        snapshot.counts.session_requests
    );
    match &snapshot.last_attempt {
        Some(attempt) => println!("Last quiz: {}% on {}", attempt.score_percent(), attempt.title()),
        None => println!("Last quiz: no attempts yet"),
    }

    if !snapshot.attending.is_empty() {
        println!();
        println!("Upcoming:");
        for session in &snapshot.attending {
            println!("  {} {} @ {}", session.title, session.day, session.time);
        }
    }
    if !snapshot.recent_requests.is_empty() {
        println!();
        println!("Requested sessions:");
        for request in &snapshot.recent_requests {
            print_request(request);
        }
    }
    if !snapshot.recent_attempts.is_empty() {
        println!();
        println!("Recent attempts:");
        for attempt in &snapshot.recent_attempts {
            println!(
                "  {:>3}% {} ({})",
                attempt.score_percent(),
                attempt.title(),
                attempt.completed_at().format("%Y-%m-%d %H:%M")
            );
        }
    }
    Ok(())
}

async fn show_metrics(app: &AppServices, auth: &AuthState) -> CommandResult {
    let metrics = ready(app.dashboard().metrics(auth).await)?;
    println!("Quizzes taken: {}", metrics.counts.attempts);
    println!("Average score: {}", display_score(metrics.average));
    println!("Best score:    {}", display_score(metrics.best));
    println!("RSVPs: {}  Saved: {}", metrics.counts.rsvps, metrics.counts.saved_resources);
    if metrics.chart.is_empty() {
        return Ok(());
    }
    println!();
    for bar in &metrics.chart {
        let width = usize::from(bar.height) / 5;
        println!("{:<12} {:<20} {}%", bar.label, "█".repeat(width), bar.score);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;
    use std::sync::Arc;

    use async_trait::async_trait;
    use peerpilot_core::StaticCatalog;
    use peerpilot_core::model::{SessionRequestDraft, TutorId};
    use peerpilot_core::time::fixed_clock;
    use services::{BrowseError, NotificationError, SessionNotifier, SessionRequestNotice};
    use storage::Storage;

    /// Mail endpoint that never answers.
    struct StalledNotifier;

    #[async_trait]
    impl SessionNotifier for StalledNotifier {
        async fn notify(&self, _notice: &SessionRequestNotice) -> Result<(), NotificationError> {
            std::future::pending().await
        }
    }

    fn app() -> AppServices {
        AppServices::new(
            Storage::in_memory(),
            Arc::new(StaticCatalog::builtin().unwrap()),
            Arc::new(StalledNotifier),
            fixed_clock(),
        )
    }

    fn request(tutor: &str) -> RequestArgs {
        RequestArgs {
            tutor: TutorId::new(tutor),
            draft: SessionRequestDraft {
                goal: "Factoring review".into(),
                duration: "30 min".into(),
                day: "Monday".into(),
                time: "4:00 PM".into(),
                ..SessionRequestDraft::default()
            },
        }
    }

    #[tokio::test]
    async fn request_is_saved_while_notification_hangs() {
        let app = app();
        let student = Student::new("Maya Chen", Some("maya@example.com".into()));
        let (saved, notification) = start_request(&app, &student, request("rey-garg"))
            .await
            .unwrap();

        assert_eq!(saved.request.details().tutor_name(), "Rey Garg");
        assert_eq!(app.session_requests().list().await, vec![saved.request]);
        assert!(!notification.is_finished());
        notification.abort();
    }

    #[tokio::test]
    async fn unknown_tutor_is_rejected_before_saving() {
        let app = app();
        let student = Student::new("Maya Chen", None);
        let err = start_request(&app, &student, request("nobody")).await.unwrap_err();
        assert_eq!(
            err.downcast_ref::<BrowseError>(),
            Some(&BrowseError::UnknownTutor("nobody".into()))
        );
        assert!(app.session_requests().list().await.is_empty());
    }

    #[test]
    fn read_answer_stops_at_end_of_input() {
        let mut input = Cursor::new("2\n");
        assert_eq!(read_answer(&mut input).unwrap().as_deref(), Some("2\n"));
        assert_eq!(read_answer(&mut input).unwrap(), None);
    }
}
