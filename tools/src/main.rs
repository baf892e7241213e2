//! grievance-runner: headless driver for the citizen grievance desk.
//!
//! One-shot commands:
//!   grievance-runner submit --db desk.db --user u1 --name "Asha" --desc "water leak near the pump"
//!   grievance-runner list --db desk.db [--status new] [--department Water]
//!   grievance-runner my --db desk.db --user u1
//!   grievance-runner set-status --db desk.db --id <id> --status under_action --actor "Ward Officer"
//!   grievance-runner classify --db desk.db --id <id>
//!   grievance-runner bot --db desk.db --text "show my pending complaints" [--user u1]
//!   grievance-runner sweep-overdue --db desk.db
//!
//! IPC mode (JSON lines over stdin/stdout, for a UI shell):
//!   grievance-runner --ipc-mode --db desk.db

use anyhow::Result;
use grievance_core::{
    bot::FaqBot,
    classifier::KeywordClassifier,
    clock::SystemClock,
    config::DeskConfig,
    error::GrievanceError,
    lifecycle::{ComplaintFilter, ComplaintLifecycle, ComplaintView, NewComplaint},
    rng::ReplyRng,
    store::DeskStore,
    types::{ComplaintStatus, GeoPoint},
};
use std::env;
use std::io::{self, BufRead, Write};
use std::str::FromStr;

#[derive(serde::Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum IpcCommand {
    Submit {
        user_id: String,
        user_name: String,
        #[serde(default)]
        mobile: Option<String>,
        description: String,
        #[serde(default)]
        lat: Option<f64>,
        #[serde(default)]
        lng: Option<f64>,
        #[serde(default)]
        image_name: Option<String>,
    },
    List {
        #[serde(default)]
        status: Option<String>,
        #[serde(default)]
        department: Option<String>,
    },
    My {
        user_id: String,
    },
    SetStatus {
        complaint_id: String,
        status: String,
        #[serde(default)]
        actor: Option<String>,
    },
    Classify {
        complaint_id: String,
    },
    Bot {
        #[serde(default)]
        user_id: Option<String>,
        message: String,
    },
    Quit,
}

fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let db = parse_str(&args, "--db").unwrap_or("desk.db");
    let data_dir = parse_str(&args, "--data-dir").unwrap_or("./data");
    let seed = parse_arg(&args, "--seed", 42u64);
    let ipc_mode = args.iter().any(|a| a == "--ipc-mode");

    let command = args.get(1).map(String::as_str).unwrap_or("");
    if !ipc_mode && command.is_empty() {
        print_usage();
        return Ok(());
    }

    let config = DeskConfig::load(data_dir)?;
    let store = DeskStore::open(db)?;
    store.migrate()?;

    let lifecycle = ComplaintLifecycle::new(
        store,
        Box::new(SystemClock),
        config.deadlines.clone(),
    )
    .with_classifier(Box::new(KeywordClassifier::new(config.classifier.clone())));
    let bot = FaqBot::new(config.bot.clone());
    let mut rng = ReplyRng::new(seed);

    if ipc_mode {
        return run_ipc_loop(&lifecycle, &bot, &mut rng);
    }

    match command {
        "submit" => cmd_submit(&args, &lifecycle),
        "list" => cmd_list(&args, &lifecycle),
        "my" => cmd_my(&args, &lifecycle),
        "set-status" => cmd_set_status(&args, &lifecycle),
        "classify" => cmd_classify(&args, &lifecycle),
        "bot" => cmd_bot(&args, &lifecycle, &bot, &mut rng),
        "sweep-overdue" => {
            let flagged = lifecycle.sweep_overdue()?;
            println!("{flagged} complaints marked overdue");
            Ok(())
        }
        other => {
            eprintln!("Unknown command: {other}");
            print_usage();
            Ok(())
        }
    }
}

fn cmd_submit(args: &[String], lifecycle: &ComplaintLifecycle) -> Result<()> {
    let lat = parse_opt::<f64>(args, "--lat");
    let lng = parse_opt::<f64>(args, "--lng");
    let input = NewComplaint {
        user_id: required(args, "--user")?.to_string(),
        user_name: required(args, "--name")?.to_string(),
        mobile: parse_str(args, "--mobile").map(str::to_string),
        description: required(args, "--desc")?.to_string(),
        location: match (lat, lng) {
            (Some(lat), Some(lng)) => Some(GeoPoint { lat, lng }),
            _ => None,
        },
        image_name: parse_str(args, "--image").map(str::to_string),
    };
    match lifecycle.submit(input) {
        Ok(record) => {
            println!("Complaint submitted: {}", record.complaint_id);
            println!("  status:   {}", record.status);
            println!("  address:  {}", record.address);
            if let Some(dept) = &record.department {
                println!("  routed:   {dept}");
            }
        }
        Err(e) => report_failure(&e),
    }
    Ok(())
}

fn cmd_list(args: &[String], lifecycle: &ComplaintLifecycle) -> Result<()> {
    let filter = ComplaintFilter {
        status: parse_str(args, "--status")
            .map(|s| ComplaintStatus::from_str(s).map_err(anyhow::Error::from))
            .transpose()?,
        department: parse_str(args, "--department").map(str::to_string),
    };
    let complaints = lifecycle.list(&filter)?;
    for view in &complaints {
        print_view(view);
    }

    let stats = lifecycle.stats()?;
    println!();
    println!("=== DESK SUMMARY ===");
    println!("  shown:        {}", complaints.len());
    println!("  total:        {}", stats.total);
    println!("  new:          {}", stats.new);
    println!("  classified:   {}", stats.classified);
    println!("  under action: {}", stats.under_action);
    println!("  resolved:     {}", stats.resolved);
    Ok(())
}

fn cmd_my(args: &[String], lifecycle: &ComplaintLifecycle) -> Result<()> {
    let user_id = required(args, "--user")?;
    let complaints = lifecycle.for_user(user_id)?;
    if complaints.is_empty() {
        println!("No complaints for {user_id}");
        return Ok(());
    }
    for view in &complaints {
        print_view(view);
    }
    Ok(())
}

fn cmd_set_status(args: &[String], lifecycle: &ComplaintLifecycle) -> Result<()> {
    let complaint_id = required(args, "--id")?;
    let status = ComplaintStatus::from_str(required(args, "--status")?)
        .map_err(anyhow::Error::from)?;
    let actor = parse_str(args, "--actor");
    match lifecycle.update_status(complaint_id, status, actor) {
        Ok(record) => println!("Status updated to {}", record.status),
        Err(e) => report_failure(&e),
    }
    Ok(())
}

fn cmd_classify(args: &[String], lifecycle: &ComplaintLifecycle) -> Result<()> {
    let complaint_id = required(args, "--id")?;
    match lifecycle.classify(complaint_id) {
        Ok(record) => println!(
            "Complaint {} -> {} ({} priority)",
            record.complaint_id,
            record
                .department
                .as_deref()
                .unwrap_or(grievance_core::lifecycle::DEPARTMENT_UNASSIGNED),
            record
                .priority
                .map(|p| p.to_string())
                .unwrap_or_else(|| "Medium".to_string()),
        ),
        Err(e) => report_failure(&e),
    }
    Ok(())
}

fn cmd_bot(
    args: &[String],
    lifecycle: &ComplaintLifecycle,
    bot: &FaqBot,
    rng: &mut ReplyRng,
) -> Result<()> {
    let message = required(args, "--text")?;
    let user_id = parse_str(args, "--user");
    let reply = if bot.wants_complaint_lookup(message) {
        bot.complaint_status_reply(user_id, message, lifecycle)
    } else {
        bot.match_faq(message, rng)
    };
    println!("{reply}");
    Ok(())
}

fn run_ipc_loop(
    lifecycle: &ComplaintLifecycle,
    bot: &FaqBot,
    rng: &mut ReplyRng,
) -> Result<()> {
    let stdin = io::stdin();
    let mut stdout = io::stdout();
    let mut handle = stdin.lock();
    let mut buffer = String::new();

    loop {
        buffer.clear();
        let bytes_read = handle.read_line(&mut buffer)?;
        if bytes_read == 0 {
            break; // EOF
        }

        let cmd: IpcCommand = match serde_json::from_str(&buffer) {
            Ok(c) => c,
            Err(e) => {
                let err_json = serde_json::json!({ "error": e.to_string() });
                writeln!(stdout, "{}", err_json)?;
                stdout.flush()?;
                continue;
            }
        };

        let response = match cmd {
            IpcCommand::Quit => break,
            IpcCommand::Submit {
                user_id,
                user_name,
                mobile,
                description,
                lat,
                lng,
                image_name,
            } => {
                let input = NewComplaint {
                    user_id,
                    user_name,
                    mobile,
                    description,
                    location: match (lat, lng) {
                        (Some(lat), Some(lng)) => Some(GeoPoint { lat, lng }),
                        _ => None,
                    },
                    image_name,
                };
                match lifecycle.submit(input) {
                    Ok(record) => serde_json::json!({
                        "success": true,
                        "message": "Complaint saved successfully",
                        "complaint_id": record.complaint_id,
                    }),
                    Err(e) => failure_json(&e),
                }
            }
            IpcCommand::List { status, department } => {
                let filter = ComplaintFilter {
                    status: match status.as_deref().map(ComplaintStatus::from_str) {
                        Some(Ok(s)) => Some(s),
                        Some(Err(e)) => {
                            write_json(&mut stdout, &serde_json::json!({
                                "success": false, "message": e.to_string(),
                            }))?;
                            continue;
                        }
                        None => None,
                    },
                    department,
                };
                match lifecycle.list(&filter) {
                    Ok(complaints) => serde_json::json!({
                        "success": true,
                        "count": complaints.len(),
                        "complaints": complaints,
                    }),
                    Err(e) => failure_json(&e),
                }
            }
            IpcCommand::My { user_id } => match lifecycle.for_user(&user_id) {
                Ok(complaints) => serde_json::json!({
                    "success": true,
                    "user_id": user_id,
                    "count": complaints.len(),
                    "complaints": complaints,
                }),
                Err(e) => failure_json(&e),
            },
            IpcCommand::SetStatus {
                complaint_id,
                status,
                actor,
            } => match ComplaintStatus::from_str(&status) {
                Ok(status) => {
                    match lifecycle.update_status(&complaint_id, status, actor.as_deref()) {
                        Ok(record) => serde_json::json!({
                            "success": true,
                            "message": format!("Status updated to {}", record.status),
                            "complaint_id": record.complaint_id,
                        }),
                        Err(e) => failure_json(&e),
                    }
                }
                Err(e) => serde_json::json!({ "success": false, "message": e.to_string() }),
            },
            IpcCommand::Classify { complaint_id } => match lifecycle.classify(&complaint_id) {
                Ok(record) => serde_json::json!({
                    "success": true,
                    "complaint_id": record.complaint_id,
                    "department": record.department,
                    "priority": record.priority.map(|p| p.to_string()),
                    "status": record.status.to_string(),
                }),
                Err(e) => failure_json(&e),
            },
            IpcCommand::Bot { user_id, message } => {
                let reply = if bot.wants_complaint_lookup(&message) {
                    bot.complaint_status_reply(user_id.as_deref(), &message, lifecycle)
                } else {
                    bot.match_faq(&message, rng)
                };
                serde_json::json!({ "reply": reply })
            }
        };

        write_json(&mut stdout, &response)?;
    }
    Ok(())
}

fn write_json(stdout: &mut io::Stdout, value: &serde_json::Value) -> Result<()> {
    writeln!(stdout, "{}", serde_json::to_string(value)?)?;
    stdout.flush()?;
    Ok(())
}

/// Short human-readable message only — no internals leak to callers.
fn failure_json(err: &GrievanceError) -> serde_json::Value {
    match err {
        GrievanceError::Validation { .. } | GrievanceError::NotFound { .. } => {
            serde_json::json!({ "success": false, "message": err.to_string() })
        }
        other => {
            log::error!("Operation failed: {other}");
            serde_json::json!({ "success": false, "message": "Operation failed" })
        }
    }
}

fn report_failure(err: &GrievanceError) {
    match err {
        GrievanceError::Validation { .. } | GrievanceError::NotFound { .. } => {
            eprintln!("{err}");
        }
        other => {
            log::error!("Operation failed: {other}");
            eprintln!("Operation failed");
        }
    }
}

fn print_view(c: &ComplaintView) {
    let overdue = if c.is_overdue { " (OVERDUE)" } else { "" };
    println!(
        "{} | {} | {} | {} | {} | {}{}",
        c.record.complaint_id,
        c.record.status,
        c.display_priority,
        c.display_department,
        c.time_passed,
        c.record.address,
        overdue,
    );
}

fn print_usage() {
    println!("grievance-runner — citizen grievance desk");
    println!();
    println!("Commands:");
    println!("  submit        --user <id> --name <name> --desc <text> [--mobile <n>] [--lat <f> --lng <f>] [--image <file>]");
    println!("  list          [--status <s>] [--department <d>]");
    println!("  my            --user <id>");
    println!("  set-status    --id <complaint> --status <new|classified|under_action|resolved> [--actor <name>]");
    println!("  classify      --id <complaint>");
    println!("  bot           --text <message> [--user <id>]");
    println!("  sweep-overdue");
    println!();
    println!("Flags: --db <path> (default desk.db), --data-dir <path> (default ./data), --seed <n>, --ipc-mode");
}

fn required<'a>(args: &'a [String], flag: &str) -> Result<&'a str> {
    parse_str(args, flag).ok_or_else(|| anyhow::anyhow!("Missing required flag: {flag}"))
}

fn parse_str<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    args.windows(2)
        .find(|w| w[0] == flag)
        .map(|w| w[1].as_str())
}

fn parse_opt<T: std::str::FromStr>(args: &[String], flag: &str) -> Option<T> {
    args.windows(2)
        .find(|w| w[0] == flag)
        .and_then(|w| w[1].parse().ok())
}

fn parse_arg<T: std::str::FromStr + Copy>(args: &[String], flag: &str, default: T) -> T {
    args.windows(2)
        .find(|w| w[0] == flag)
        .and_then(|w| w[1].parse().ok())
        .unwrap_or(default)
}
