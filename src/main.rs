//! Dot the World shell
//!
//! A small interactive front end over the core stores, standing in for the
//! map and list surfaces: drop pins, filter and search them, comment, and
//! manage the session, against file-backed storage.

use std::io::{self, BufRead, Write};

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use dots_core::config::Config;
use dots_core::errors::AppError;
use dots_core::models::{NewPin, User};
use dots_core::store::SignupRequest;
use dots_core::view::{DetailView, ListView, MapView};
use dots_core::App;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load configuration
    let config = Config::from_env();

    // Initialize logging
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Dot the World shell");
    tracing::info!("Data directory: {:?}", config.data_dir);

    let mut app = App::open(config)?;
    let mut map = MapView::new();
    let mut list = ListView::new(&mut app.pins);

    let stdin = io::stdin();
    let mut stdout = io::stdout();
    print_help();

    loop {
        print!("> ");
        stdout.flush()?;
        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }
        let args: Vec<&str> = line.split_whitespace().collect();
        let Some((&command, rest)) = args.split_first() else {
            continue;
        };

        match dispatch(command, rest, &mut app, &mut map, &mut list) {
            Ok(true) => break,
            Ok(false) => {}
            Err(err) => println!("error [{}]: {}", err.error_code(), err),
        }
        list.sync(&app.pins);
    }

    Ok(())
}

/// Run one command; `Ok(true)` means quit.
fn dispatch(
    command: &str,
    args: &[&str],
    app: &mut App,
    map: &mut MapView,
    list: &mut ListView,
) -> Result<bool, AppError> {
    match command {
        "quit" | "exit" => return Ok(true),
        "help" => print_help(),
        "signup" => match args {
            [name, email, password] => {
                let user = app.session.signup(&SignupRequest {
                    name: name.to_string(),
                    email: email.to_string(),
                    password: password.to_string(),
                })?;
                println!("signed up as {}", user.email);
            }
            _ => return usage("signup <name> <email> <password>"),
        },
        "login" => match args {
            [email, password] => {
                let user = app.session.login(email, password)?;
                println!("welcome back, {}", user.name);
            }
            _ => return usage("login <email> <password>"),
        },
        "logout" => {
            app.session.logout()?;
            println!("logged out");
        }
        "whoami" => match app.session.current_user() {
            Some(user) => println!("{} <{}>", user.name, user.email),
            None => println!("not logged in"),
        },
        "click" => match args {
            [lat, lng] => {
                let token = map.begin_placement(parse_f64(lat)?, parse_f64(lng)?);
                println!("pending pin (token {}); use `place` and `save`", token);
            }
            _ => return usage("click <lat> <lng>"),
        },
        // Stands in for the reverse-geocode completion
        "place" => match map.pending_token() {
            Some(token) => map.resolve_location(token, &args.join(" ")),
            None => return Err(AppError::Validation("No pending pin".to_string())),
        },
        "save" => match args {
            [name, category, rest @ ..] => {
                let author = app.session.current_user().map(User::as_author);
                let pin = map.confirm(
                    &NewPin {
                        name: name.to_string(),
                        category: category.to_string(),
                        color: rest.first().unwrap_or(&"").to_string(),
                        ..Default::default()
                    },
                    &mut app.pins,
                    &mut app.categories,
                    author,
                )?;
                println!("saved pin {} ({})", pin.id, pin.color);
            }
            _ => return usage("save <name> <category> [color]"),
        },
        "cancel" => map.cancel(),
        "list" => {
            list.sync(&app.pins);
            for pin in list.results() {
                println!(
                    "  {} | {} [{}] ({}, {}) {}",
                    pin.id, pin.name, pin.category, pin.lat, pin.lng, pin.location_name
                );
            }
            println!("{} pin(s)", list.results().len());
        }
        "region" => list.set_region(args.first().map(|s| s.to_string())),
        "category" => list.set_category(args.first().map(|s| s.to_string())),
        "search" => list.set_keyword(&args.join(" ")),
        "mine" => match app.session.current_user() {
            Some(user) => list.set_author(Some(user.email.clone())),
            None => return Err(AppError::Unauthorized("Log in first".to_string())),
        },
        "clear" => list.clear_filters(),
        "show" => match args {
            [id] => {
                let pin = app
                    .pins
                    .get(id)
                    .ok_or_else(|| AppError::NotFound(format!("Pin {} not found", id)))?;
                println!("{} [{}] {}", pin.name, pin.category, pin.comment);
                for (i, comment) in pin.comments.iter().enumerate() {
                    println!(
                        "  #{} {}: {} ({} likes)",
                        i,
                        comment.author.name,
                        comment.text,
                        comment.likes.len()
                    );
                }
            }
            _ => return usage("show <pin-id>"),
        },
        "comment" => match args {
            [id, text @ ..] if !text.is_empty() => {
                let user = logged_in(app)?;
                DetailView::open(id).add_comment(&mut app.pins, &user, &text.join(" "), None)?;
            }
            _ => return usage("comment <pin-id> <text...>"),
        },
        "like" => match args {
            [id, index] => {
                let index: usize = index
                    .parse()
                    .map_err(|_| AppError::Validation("Invalid comment index".to_string()))?;
                let user = logged_in(app)?;
                DetailView::open(id).toggle_like(&mut app.pins, &user, index)?;
            }
            _ => return usage("like <pin-id> <comment-index>"),
        },
        "delete" => match args {
            [id] => {
                let user = logged_in(app)?;
                DetailView::open(id).delete(&mut app.pins, Some(&user))?;
                println!("deleted {}", id);
            }
            _ => return usage("delete <pin-id>"),
        },
        "reload" => app.reload(),
        other => println!("unknown command: {} (try `help`)", other),
    }
    Ok(false)
}

fn print_help() {
    println!("commands:");
    println!("  signup <name> <email> <password> | login <email> <password> | logout | whoami");
    println!("  click <lat> <lng> | place <location name...> | save <name> <category> [color] | cancel");
    println!("  list | region [name] | category [name] | search <keyword...> | mine | clear");
    println!("  show <pin-id> | comment <pin-id> <text...> | like <pin-id> <index> | delete <pin-id>");
    println!("  reload | quit");
}

fn usage(text: &str) -> Result<bool, AppError> {
    Err(AppError::Validation(format!("usage: {}", text)))
}

fn parse_f64(raw: &str) -> Result<f64, AppError> {
    raw.parse()
        .map_err(|_| AppError::Validation(format!("Invalid coordinate {}", raw)))
}

fn logged_in(app: &App) -> Result<User, AppError> {
    app.session
        .current_user()
        .cloned()
        .ok_or_else(|| AppError::Unauthorized("Log in first".to_string()))
}
