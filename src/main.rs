use std::sync::Arc;

use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use eco_hub::client::EcoApiClient;
use eco_hub::config::ApiConfig;
use eco_hub::notify::LogNotifier;
use eco_hub::services::course_list::NO_COURSES_NOTICE;
use eco_hub::services::{
    CourseListLoader, Field, LoadState, RegistrationModal, SubmitOutcome,
};

const USAGE: &str = "usage: eco_hub [<course_id> <name> <phone> <email> [participants]]";

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "eco_hub=debug".to_string()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = ApiConfig::new_from_env()?;
    info!("using api at {}", config.api_root());

    let client = Arc::new(EcoApiClient::new(&config)?);
    let notifier = Arc::new(LogNotifier);

    let mut loader = CourseListLoader::new(client.clone(), notifier.clone());
    match loader.activate().await {
        LoadState::Populated(cards) => {
            for card in cards {
                println!(
                    "[{}] {} ({})\n    {} {} @ {}\n    {}",
                    card.id,
                    card.title,
                    card.category,
                    card.date,
                    card.time,
                    card.location,
                    card.spots_label()
                );
            }
        }
        LoadState::Empty => println!("{}", NO_COURSES_NOTICE),
        LoadState::Failed(err) => return Err(err.clone().into()),
        LoadState::Loading => {}
    }

    let args: Vec<String> = std::env::args().skip(1).collect();
    if args.is_empty() {
        return Ok(());
    }
    if args.len() < 4 {
        eprintln!("{}", USAGE);
        return Ok(());
    }

    let course_id: i64 = args[0].parse()?;
    let Some(summary) = loader.course_summary(course_id) else {
        warn!("course {} is not in the upcoming list", course_id);
        return Ok(());
    };

    let mut modal = RegistrationModal::new(client, notifier);
    modal.open(summary);
    modal.set_field(Field::Name, args[1].as_str())?;
    modal.set_field(Field::Phone, args[2].as_str())?;
    modal.set_field(Field::Email, args[3].as_str())?;
    if let Some(participants) = args.get(4) {
        modal.set_field(Field::Participants, participants.as_str())?;
    }

    match modal.submit().await? {
        SubmitOutcome::Succeeded(registration) => {
            println!("registration #{} ({})", registration.id, registration.status);
        }
        SubmitOutcome::Failed(err) => return Err(err.into()),
        SubmitOutcome::Stale => {}
    }

    Ok(())
}
