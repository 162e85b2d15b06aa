//! MicroReset - Wellness Check-in Engine
//!
//! Command-line entry point.

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use chrono::{NaiveDate, Utc};
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use uuid::Uuid;

use microreset::actions::{
    builtin_actions, rank_actions, select_categories, CategoryInput, ConditionTag, MicroAction,
    RankingContext,
};
use microreset::brief::BriefService;
use microreset::checkin::{AfternoonState, CheckinDraft, CheckinService, EventType, Trigger};
use microreset::recovery::{protocol_label, recovery_duration, Intensity};
use microreset::scenario::ScenarioService;
use microreset::storage::config::{
    load_config, load_config_from, save_config, save_config_to, AppConfig,
};
use microreset::storage::{
    ActionStore, Database, RecoveryStore, SubscriptionStore, UserProfile,
};
use microreset::subscription::{
    gate_report, GateResult, Plan, Subscription, SubscriptionStatus,
};

/// MicroReset - short wellness check-ins and recovery plans
#[derive(Parser)]
#[command(name = "microreset")]
#[command(version)]
#[command(about = "Condition-aware micro-actions, recovery protocols and weekly briefs")]
#[command(propagate_version = true)]
struct Cli {
    /// Config file (defaults to the platform data directory)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Profile to act as (defaults to the first profile)
    #[arg(long, global = true)]
    user: Option<Uuid>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Preview categories and actions for a context without saving anything
    Suggest(ContextArgs),
    /// Recovery days and protocol label for an event
    Recovery {
        /// heavy_night, long_desk, poor_sleep or travel
        event: String,
        /// light, moderate or heavy
        #[arg(default_value = "moderate")]
        intensity: String,
    },
    /// Show (or advance) the active recovery protocol
    Protocol {
        /// Mark the current day as done
        #[arg(long)]
        advance: bool,
    },
    /// Preview the recovery plan for an upcoming event
    Scenario {
        event: String,
        #[arg(default_value = "moderate")]
        intensity: String,
    },
    /// Profile management
    Profile {
        #[command(subcommand)]
        action: ProfileCommands,
    },
    /// Submit a check-in for the current profile
    Checkin(ContextArgs),
    /// Set the subscription of the current profile
    Subscribe {
        /// active, trialing, past_due, canceled or none
        #[arg(long, default_value = "active")]
        status: String,
        /// free, individual or household
        #[arg(long, default_value = "individual")]
        plan: String,
    },
    /// Show every feature gate for the current profile
    Gates,
    /// Read the weekly brief
    Brief {
        /// Any date in the week (defaults to this week)
        #[arg(long)]
        week: Option<NaiveDate>,
    },
    /// Store the built-in micro-action library
    Seed,
    /// Print the active configuration
    Config {
        /// Write the configuration file with current values
        #[arg(long)]
        init: bool,
    },
}

#[derive(Subcommand)]
enum ProfileCommands {
    /// Create a profile
    Create {
        name: String,
        /// gout, cholesterol or back_pain (repeatable)
        #[arg(long = "condition")]
        conditions: Vec<String>,
    },
    /// Show the current profile
    Show,
}

#[derive(Args)]
struct ContextArgs {
    /// morning, midday, post_event or pre_sleep
    trigger: String,

    /// back_tight, sluggish or stressed
    #[arg(long)]
    afternoon: Option<String>,

    /// Logged event for post_event check-ins
    #[arg(long)]
    event: Option<String>,

    /// light, moderate or heavy
    #[arg(long)]
    intensity: Option<String>,

    /// Back pain, 0-10
    #[arg(long)]
    back_pain: Option<u8>,

    /// Conditions to weigh (suggest only; check-ins use the profile)
    #[arg(long = "condition")]
    conditions: Vec<String>,
}

impl ContextArgs {
    fn draft(&self) -> Result<CheckinDraft> {
        let mut draft = CheckinDraft::for_trigger(Trigger::from_name(&self.trigger));
        draft.afternoon_state = self.afternoon.as_deref().map(AfternoonState::from_name);
        draft.event_type = self.event.as_deref().map(EventType::from_name);
        draft.intensity = self.intensity.as_deref().map(parse_intensity).transpose()?;
        draft.back_pain_score = self.back_pain;
        Ok(draft)
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let loaded = match &cli.config {
        Some(path) => load_config_from(path),
        None => load_config(),
    };
    let (config, config_error) = match loaded {
        Ok(config) => (config, None),
        Err(e) => (AppConfig::default(), Some(e)),
    };

    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.logging.filter)),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    if let Some(e) = config_error {
        tracing::warn!("Failed to load config, using defaults: {}", e);
    }

    tracing::debug!("Starting MicroReset v{}", env!("CARGO_PKG_VERSION"));

    match cli.command {
        Commands::Suggest(args) => suggest(&args),
        Commands::Recovery { event, intensity } => recovery(&event, &intensity),
        Commands::Protocol { advance } => protocol(&config, cli.user, advance),
        Commands::Scenario { event, intensity } => scenario(&config, cli.user, &event, &intensity),
        Commands::Profile { action } => profile(&config, cli.user, action),
        Commands::Checkin(args) => checkin(&config, cli.user, &args),
        Commands::Subscribe { status, plan } => subscribe(&config, cli.user, &status, &plan),
        Commands::Gates => gates(&config, cli.user),
        Commands::Brief { week } => brief(&config, cli.user, week),
        Commands::Seed => seed(&config),
        Commands::Config { init } => show_config(&config, cli.config.as_deref(), init),
    }
}

// ========== Helpers ==========

fn open_db(config: &AppConfig) -> Result<Database> {
    let path = config.database_path();
    Database::open(&path).with_context(|| format!("Failed to open database {}", path.display()))
}

fn current_user(db: &Database, user: Option<Uuid>) -> Result<UserProfile> {
    match user {
        Some(id) => db
            .get_user(&id)?
            .with_context(|| format!("No profile with id {}", id)),
        None => Ok(db.get_or_create_default_user()?),
    }
}

fn parse_intensity(name: &str) -> Result<Intensity> {
    Intensity::parse(name).with_context(|| format!("Unknown intensity '{}'", name))
}

fn parse_conditions(names: &[String]) -> Vec<ConditionTag> {
    for name in names {
        if ConditionTag::parse(name).is_none() {
            tracing::warn!("Ignoring unknown condition '{}'", name);
        }
    }
    ConditionTag::parse_all(names)
}

fn describe_gate(gate: &GateResult) -> String {
    match (gate.allowed, gate.reason, gate.remaining_uses) {
        (true, _, None) => "unlimited".to_string(),
        (true, _, Some(left)) => format!("{} free use(s) left", left),
        (false, Some(reason), _) => format!("locked ({})", reason),
        (false, None, _) => "locked".to_string(),
    }
}

fn print_actions(actions: &[MicroAction]) {
    if actions.is_empty() {
        println!("  (no matching actions)");
    }
    for action in actions {
        println!(
            "  {} ({}) [{}]",
            action.title,
            action.duration_display(),
            action.category.label()
        );
    }
}

// ========== Commands ==========

fn suggest(args: &ContextArgs) -> Result<()> {
    let draft = args.draft()?;
    let conditions = parse_conditions(&args.conditions);
    let input: CategoryInput = draft
        .to_category_input(&conditions)
        .context("A trigger is required")?;

    let selection = select_categories(&input);
    let context = RankingContext {
        trigger: draft.trigger,
        event_type: draft.event_type,
        conditions,
        exclude: Vec::new(),
    };
    let actions = rank_actions(&selection, &builtin_actions(), &context);

    let labels: Vec<&str> = selection.categories.iter().map(|c| c.label()).collect();
    println!("Categories: {}", labels.join(", "));
    print_actions(&actions);
    Ok(())
}

fn recovery(event: &str, intensity: &str) -> Result<()> {
    let event = EventType::from_name(event);
    let intensity = parse_intensity(intensity)?;
    let days = recovery_duration(event, intensity);
    println!(
        "{}: {} day{}",
        protocol_label(event),
        days,
        if days == 1 { "" } else { "s" }
    );
    Ok(())
}

fn protocol(config: &AppConfig, user: Option<Uuid>, advance: bool) -> Result<()> {
    let db = open_db(config)?;
    let user = current_user(&db, user)?;
    let store = RecoveryStore::new(db.connection());

    let protocol = if advance {
        store.advance_active(&user.id, Utc::now())?
    } else {
        store.active_for_user(&user.id)?
    };

    match protocol {
        Some(p) if p.is_completed() => println!("{} complete", p.label),
        Some(p) => println!("{} ({}% done)", p.headline(), p.progress_percent()),
        None => println!("No active recovery protocol"),
    }
    Ok(())
}

fn scenario(config: &AppConfig, user: Option<Uuid>, event: &str, intensity: &str) -> Result<()> {
    let db = open_db(config)?;
    let user = current_user(&db, user)?;

    let preview = ScenarioService::new(&db, config.free_tier).view(
        &user.id,
        EventType::from_name(event),
        parse_intensity(intensity)?,
    )?;

    let labels: Vec<&str> = preview.selection.categories.iter().map(|c| c.label()).collect();
    println!("{} - {} day(s)", preview.label, preview.recovery_days);
    println!("Focus: {}", labels.join(", "));
    Ok(())
}

fn profile(config: &AppConfig, user: Option<Uuid>, action: ProfileCommands) -> Result<()> {
    let db = open_db(config)?;

    match action {
        ProfileCommands::Create { name, conditions } => {
            if !UserProfile::validate_name(&name) {
                bail!("Name must be 1-60 characters");
            }
            let mut profile = UserProfile::new(name);
            profile.set_conditions(&parse_conditions(&conditions));
            profile.onboarding_complete = true;
            db.insert_user(&profile)?;
            println!("Created profile {} ({})", profile.name, profile.id);
        }
        ProfileCommands::Show => {
            let profile = current_user(&db, user)?;
            let subscription = SubscriptionStore::new(db.connection()).get_for_user(&profile.id)?;
            let conditions: Vec<String> = profile.conditions.iter().map(|c| c.to_string()).collect();

            println!("{} ({})", profile.name, profile.id);
            println!(
                "Conditions: {}",
                if conditions.is_empty() {
                    "none".to_string()
                } else {
                    conditions.join(", ")
                }
            );
            match subscription {
                Some(sub) => println!("Subscription: {} / {}", sub.plan.as_str(), sub.status.as_str()),
                None => println!("Subscription: none"),
            }
            println!(
                "Free uses: {} scenario, {} post-event, {} brief",
                profile.usage.free_scenario_uses,
                profile.usage.free_post_event_uses,
                profile.usage.free_brief_reads
            );
            println!("Check-ins: {}", db.count_checkins(&profile.id)?);
        }
    }
    Ok(())
}

fn checkin(config: &AppConfig, user: Option<Uuid>, args: &ContextArgs) -> Result<()> {
    let db = open_db(config)?;
    let user = current_user(&db, user)?;
    let draft = args.draft()?;

    let outcome = CheckinService::from_config(&db, config).submit(&user.id, &draft, Utc::now())?;

    let labels: Vec<&str> = outcome.selection.categories.iter().map(|c| c.label()).collect();
    println!("Categories: {}", labels.join(", "));
    print_actions(&outcome.actions);
    if let Some(protocol) = outcome.protocol {
        println!("Started {}", protocol.headline());
    }
    Ok(())
}

fn subscribe(config: &AppConfig, user: Option<Uuid>, status: &str, plan: &str) -> Result<()> {
    let db = open_db(config)?;
    let user = current_user(&db, user)?;

    let subscription = Subscription::new(
        user.id,
        SubscriptionStatus::from_name(status),
        Plan::from_name(plan),
    );
    SubscriptionStore::new(db.connection()).upsert(&subscription)?;
    println!(
        "{} is now on {} ({})",
        user.name,
        subscription.plan.as_str(),
        subscription.status.as_str()
    );
    Ok(())
}

fn gates(config: &AppConfig, user: Option<Uuid>) -> Result<()> {
    let db = open_db(config)?;
    let user = current_user(&db, user)?;
    let subscription = SubscriptionStore::new(db.connection()).get_for_user(&user.id)?;
    let report = gate_report(subscription.as_ref(), &user.usage, &config.free_tier);

    println!("Scenario preview:    {}", describe_gate(&report.scenario));
    println!("Post-event check-in: {}", describe_gate(&report.post_event_checkin));
    println!("Weekly brief:        {}", describe_gate(&report.weekly_brief));
    println!("Condition insights:  {}", describe_gate(&report.condition_insights));
    println!("Household invite:    {}", describe_gate(&report.household_invite));
    Ok(())
}

fn brief(config: &AppConfig, user: Option<Uuid>, week: Option<NaiveDate>) -> Result<()> {
    let db = open_db(config)?;
    let user = current_user(&db, user)?;
    let now = Utc::now();
    let week = week.unwrap_or_else(|| now.date_naive());

    let brief = BriefService::new(&db, config.free_tier).read(&user.id, week, now)?;

    println!("Week of {}", brief.week_start);
    println!("{}", brief.summary);
    if let Some(pain) = brief.average_back_pain {
        println!("Average back pain: {:.1}", pain);
    }
    Ok(())
}

fn seed(config: &AppConfig) -> Result<()> {
    let db = open_db(config)?;
    let count = ActionStore::new(db.connection()).seed_builtin()?;
    println!("Stored {} micro-actions", count);
    Ok(())
}

fn show_config(config: &AppConfig, path: Option<&std::path::Path>, init: bool) -> Result<()> {
    if init {
        match path {
            Some(path) => save_config_to(config, path)?,
            None => save_config(config)?,
        }
    }

    let path = path
        .map(|p| p.to_path_buf())
        .unwrap_or_else(microreset::storage::config::get_config_path);
    if init {
        println!("Wrote {}", path.display());
    }

    println!("# {}", path.display());
    println!("# database: {}", config.database_path().display());
    print!("{}", toml::to_string_pretty(config)?);
    Ok(())
}
