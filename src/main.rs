use std::env;
use std::path::PathBuf;
use std::sync::Arc;

use dotenvy::dotenv;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use todo_client::annotate::{self, badges};
use todo_client::api::{ChatSession, TaskFilter, TaskStatus};
use todo_client::models::chat::ChatOutcome;
use todo_client::models::task::{Priority, Task, TaskCreate, TaskUpdate};
use todo_client::{ApiClient, ApiClientError, FileTokenStore};

const USAGE: &str = "\
Usage: todo <command> [args]

Commands:
  register <email> <password>   Create an account
  login <email> <password>      Log in and store the session token
  logout                        End the session
  whoami                        Show the logged-in account
  list [pending|completed]      List tasks
  add <title> [description]     Create a task
  edit <id> <title> [text|-]    Retitle a task; text replaces the
                                description, a lone - clears it
  done <id>                     Mark a task completed
  rm <id>                       Delete a task
  search <query...>             Full-text search over tasks
  chat <message...>             Talk to the task agent

Environment:
  TODO_API_URL   Backend base URL (default http://localhost:8000)
  TODO_HOME      Token directory (default ~/.todo)
";

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv().ok();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "todo_client=debug".to_string()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args: Vec<String> = env::args().skip(1).collect();
    let Some(command) = args.first() else {
        eprint!("{}", USAGE);
        std::process::exit(2);
    };

    let store = Arc::new(FileTokenStore::new(token_dir()));
    let client = ApiClient::from_env(store)?;

    if let Err(e) = run(&client, command, &args[1..]).await {
        if let Some(api_err) = e.downcast_ref::<ApiClientError>() {
            if api_err.is_auth_expired() {
                eprintln!("Session expired or not logged in. Run `todo login <email> <password>`.");
            } else {
                eprintln!("Error: {} ({})", api_err.message(), api_err.code());
            }
        } else {
            eprintln!("Error: {}", e);
        }
        std::process::exit(1);
    }

    Ok(())
}

async fn run(
    client: &ApiClient,
    command: &str,
    args: &[String],
) -> Result<(), Box<dyn std::error::Error>> {
    match command {
        "register" => {
            let [email, password] = two_args(args, "todo register <email> <password>")?;
            let response = client.register(email, password).await?;
            println!("Registered {} (user {})", response.user.email, response.user.id);
            println!("Log in with: todo login {} <password>", response.user.email);
        }
        "login" => {
            let [email, password] = two_args(args, "todo login <email> <password>")?;
            let response = client.login(email, password).await?;
            println!("Logged in as {}", response.user.email);
        }
        "logout" => match client.logout().await {
            Ok(()) => println!("Logged out."),
            // The local token is gone either way; a dead session upstream
            // changes nothing for the user.
            Err(e) if e.is_auth_expired() => println!("Logged out."),
            Err(e) => {
                println!("Logged out locally; the server could not be told: {}", e.message());
            }
        },
        "whoami" => match client.current_user() {
            Some(user) => println!("{} (user {})", user.email, user.id),
            None => println!("Not logged in."),
        },
        "list" => {
            let filter = match args.first().map(String::as_str) {
                None => TaskFilter::new(),
                Some("pending") => TaskFilter::new().status(TaskStatus::Pending),
                Some("completed") => TaskFilter::new().status(TaskStatus::Completed),
                Some(other) => return Err(format!("unknown status filter: {}", other).into()),
            };
            let tasks = client.list_tasks(&filter).await?;
            if tasks.is_empty() {
                println!("No tasks.");
            }
            for task in &tasks {
                print_task(task);
            }
        }
        "add" => {
            let Some(title) = args.first() else {
                return Err("usage: todo add <title> [description]".into());
            };
            let mut create = TaskCreate::new(title.clone());
            if args.len() > 1 {
                create = create.description(args[1..].join(" "));
            }
            if let Err(invalid) = create.validate() {
                for (field, problems) in invalid.details.iter().flatten() {
                    for problem in problems {
                        eprintln!("{}: {}", field, problem);
                    }
                }
                std::process::exit(2);
            }
            let task = client.create_task(&create).await?;
            println!("Created task {}: {}", task.id, task.title);
        }
        "edit" => {
            let (id, update) = edit_args(args)?;
            let task = client.update_task(id, &update).await?;
            println!("Updated task {}: {}", task.id, task.title);
        }
        "done" => {
            let id = id_arg(args, "todo done <id>")?;
            let task = client.complete_task(id).await?;
            println!("Completed task {}: {}", task.id, task.title);
        }
        "rm" => {
            let id = id_arg(args, "todo rm <id>")?;
            client.delete_task(id).await?;
            println!("Deleted task {}.", id);
        }
        "search" => {
            if args.is_empty() {
                return Err("usage: todo search <query...>".into());
            }
            let query = args.join(" ");
            let tasks = client.search_tasks(&query, &TaskFilter::new()).await?;
            if tasks.is_empty() {
                println!("No matches for \"{}\".", query);
            }
            for task in &tasks {
                print_task(task);
            }
        }
        "chat" => {
            if args.is_empty() {
                return Err("usage: todo chat <message...>".into());
            }
            let Some(user) = client.current_user() else {
                return Err("log in first: todo login <email> <password>".into());
            };
            let mut session = ChatSession::new(client.clone(), user.id);
            match session.send(&args.join(" ")).await? {
                ChatOutcome::Reply(reply) => print_chat_reply(&reply.response),
                ChatOutcome::Failure(failure) => {
                    eprintln!("Agent error ({}): {}", failure.error, failure.message);
                    std::process::exit(1);
                }
            }
        }
        _ => {
            eprintln!("Unknown command: {}", command);
            eprintln!();
            eprint!("{}", USAGE);
            std::process::exit(2);
        }
    }

    Ok(())
}

fn two_args<'a>(args: &'a [String], usage: &str) -> Result<[&'a str; 2], String> {
    match args {
        [a, b] => Ok([a.as_str(), b.as_str()]),
        _ => Err(format!("usage: {}", usage)),
    }
}

fn id_arg(args: &[String], usage: &str) -> Result<i64, String> {
    let Some(raw) = args.first() else {
        return Err(format!("usage: {}", usage));
    };
    raw.parse()
        .map_err(|_| format!("invalid task id: {}", raw))
}

fn edit_args(args: &[String]) -> Result<(i64, TaskUpdate), String> {
    let usage = "todo edit <id> <title> [text|-]";
    if args.len() < 2 {
        return Err(format!("usage: {}", usage));
    }
    let id = id_arg(args, usage)?;
    let mut update = TaskUpdate::new().title(args[1].clone());
    if args.len() > 2 {
        let text = args[2..].join(" ");
        // A lone `-` clears the stored description; anything else replaces it.
        update = update.description(if text == "-" { None } else { Some(text) });
    }
    Ok((id, update))
}

fn token_dir() -> PathBuf {
    if let Ok(dir) = env::var("TODO_HOME") {
        return PathBuf::from(dir);
    }
    match env::var("HOME") {
        Ok(home) => PathBuf::from(home).join(".todo"),
        Err(_) => PathBuf::from(".todo"),
    }
}

fn print_task(task: &Task) {
    let mark = if task.completed { "x" } else { " " };
    let mut extras = Vec::new();
    if task.effective_priority() != Priority::Medium {
        extras.push(task.effective_priority().to_string());
    }
    if let Some(due) = &task.due_date {
        extras.push(format!("due {}", badges::due_label(due, task.completed)));
    }
    if let Some(recurrence) = task.recurrence_pattern {
        extras.push(format!("repeats {}", recurrence));
    }
    for tag in task.tags.iter().flatten() {
        extras.push(format!("#{}", tag));
    }
    if extras.is_empty() {
        println!("[{}] {:>4}  {}", mark, task.id, task.title);
    } else {
        println!("[{}] {:>4}  {} ({})", mark, task.id, task.title, extras.join(", "));
    }
}

/// Chat replies that mention tasks get rendered as task lines; anything
/// else is printed verbatim.
fn print_chat_reply(response: &str) {
    let annotations = annotate::parse_annotations(response);
    if annotations.is_empty() {
        println!("{}", response);
        return;
    }
    for annotation in &annotations {
        let mark = if annotation.completed { "x" } else { " " };
        if !badges::has_notable_metadata(annotation) {
            println!("[{}] {:>4}  {}", mark, annotation.id, annotation.title);
            continue;
        }
        let mut extras = Vec::new();
        if let Some(priority) = annotation.priority {
            if priority != Priority::Medium {
                extras.push(priority.to_string());
            }
        }
        if let Some(due) = &annotation.due_date {
            extras.push(format!("due {}", badges::due_label(due, annotation.completed)));
        }
        if let Some(recurrence) = annotation.recurrence_pattern {
            extras.push(format!("repeats {}", recurrence));
        }
        for tag in annotation.tags.iter().flatten() {
            extras.push(format!("#{}", tag));
        }
        println!(
            "[{}] {:>4}  {} ({})",
            mark,
            annotation.id,
            annotation.title,
            extras.join(", ")
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_edit_args_maps_dash_to_cleared_description() {
        let args = ["5", "Regroup", "-"].map(String::from);
        let (id, update) = edit_args(&args).expect("Failed to parse edit args");
        assert_eq!(id, 5);
        assert_eq!(update.title.as_deref(), Some("Regroup"));
        // Explicit clear, not an omitted field.
        assert_eq!(update.description, Some(None));
    }

    #[test]
    fn test_edit_args_joins_description_words() {
        let args = ["7", "Pack bags", "passports", "and", "chargers"].map(String::from);
        let (id, update) = edit_args(&args).expect("Failed to parse edit args");
        assert_eq!(id, 7);
        assert_eq!(
            update.description,
            Some(Some("passports and chargers".to_string()))
        );
    }

    #[test]
    fn test_edit_args_without_description_leaves_it_untouched() {
        let args = ["7", "Pack bags"].map(String::from);
        let (_, update) = edit_args(&args).expect("Failed to parse edit args");
        assert_eq!(update.description, None);

        assert!(edit_args(&["7".to_string()]).is_err());
        assert!(edit_args(&["seven".to_string(), "Pack bags".to_string()]).is_err());
    }
}
