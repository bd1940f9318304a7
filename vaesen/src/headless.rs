//! Headless mode for the investigator manager.
//!
//! A line-oriented interface over one campaign, suitable for scripting and
//! automated testing. Output lines are tagged (`[ROLL]`, `[HQ]`, `[ERROR]`
//! and so on) so they are easy to match.

use crate::store::{self, campaign_save_path, StoreError};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use thiserror::Error;
use vaesen_core::conditions::BROKEN_THRESHOLD;
use vaesen_core::world::{AgeGroup, Attribute, ConditionKind, Skill};
use vaesen_core::{
    BuilderError, Campaign, CampaignCreationData, CharacterBuilder, DicePoolEngine,
    EngineConfig, FearOutcome, Headquarters, IntegrityWarning, ResistWith, RulesTables, Test,
    TABLES,
};

/// Directory used for quick-start saves when no path is given.
const DEFAULT_SAVE_DIR: &str = "saves";

#[derive(Debug, Error)]
pub enum HeadlessError {
    #[error("Unknown archetype: {0}")]
    UnknownArchetype(String),

    #[error("Unknown age group: {0}")]
    UnknownAge(String),

    #[error("No campaign: pass --campaign <path> or --quick-start <name> <archetype>")]
    NoCampaign,

    #[error(transparent)]
    Builder(#[from] BuilderError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

// ============================================================================
// Configuration
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuickStart {
    pub name: String,
    pub archetype: String,
    pub age: Option<String>,
}

/// Startup options from the environment and command line.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HeadlessConfig {
    pub campaign_path: Option<PathBuf>,
    pub quick_start: Option<QuickStart>,
    pub seed: Option<u64>,
    pub engine: EngineConfig,
    pub show_help: bool,
}

/// Read `VAESEN_CAMPAIGN` and `VAESEN_HISTORY_LEN` through `var`.
pub fn config_from_env(var: impl Fn(&str) -> Option<String>) -> HeadlessConfig {
    let mut config = HeadlessConfig::default();
    config.campaign_path = var("VAESEN_CAMPAIGN").map(PathBuf::from);
    if let Some(len) = var("VAESEN_HISTORY_LEN") {
        match len.trim().parse() {
            Ok(len) => config.engine = config.engine.with_history_len(len),
            Err(_) => tracing::warn!(value = %len, "ignoring invalid VAESEN_HISTORY_LEN"),
        }
    }
    config
}

/// Apply command line flags on top of `config`.
pub fn parse_config_from_args(mut config: HeadlessConfig, args: &[String]) -> HeadlessConfig {
    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--help" | "-h" => config.show_help = true,
            "--campaign" => {
                if let Some(path) = args.get(i + 1) {
                    config.campaign_path = Some(PathBuf::from(path));
                    i += 1;
                }
            }
            "--seed" => {
                if let Some(seed) = args.get(i + 1) {
                    match seed.parse() {
                        Ok(seed) => config.seed = Some(seed),
                        Err(_) => tracing::warn!(value = %seed, "ignoring invalid --seed"),
                    }
                    i += 1;
                }
            }
            "--quick-start" => {
                if let (Some(name), Some(archetype)) = (args.get(i + 1), args.get(i + 2)) {
                    let age = args.get(i + 3).filter(|a| !a.starts_with("--")).cloned();
                    i += if age.is_some() { 3 } else { 2 };
                    config.quick_start = Some(QuickStart {
                        name: name.clone(),
                        archetype: archetype.clone(),
                        age,
                    });
                }
            }
            other => tracing::warn!(argument = other, "ignoring unknown argument"),
        }
        i += 1;
    }
    config
}

/// Build a new campaign around an auto-allocated character.
pub fn quick_start_campaign<R: Rng + ?Sized>(
    quick: &QuickStart,
    engine: &EngineConfig,
    tables: &RulesTables,
    rng: &mut R,
) -> Result<Campaign, HeadlessError> {
    let archetype = tables
        .archetype(&quick.archetype)
        .ok_or_else(|| HeadlessError::UnknownArchetype(quick.archetype.clone()))?;
    let age = match &quick.age {
        Some(age) => AgeGroup::from_name(age).ok_or_else(|| HeadlessError::UnknownAge(age.clone()))?,
        None => AgeGroup::default(),
    };

    let mut builder = CharacterBuilder::new(archetype.clone());
    builder.set_name(quick.name.as_str());
    builder.set_age(age);
    builder.auto_allocate();
    builder.choose_equipment_defaults();
    let character = builder.build_with_rng(tables, rng)?;

    let headquarters = Headquarters::new(engine, tables);
    Ok(Campaign::new(
        "local",
        CampaignCreationData::new(character, headquarters),
    ))
}

// ============================================================================
// Commands
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    #[error("Usage: {0}")]
    Usage(&'static str),

    #[error("Unknown skill: {0}")]
    UnknownSkill(String),

    #[error("Unknown attribute: {0}")]
    UnknownAttribute(String),

    #[error("Resist fear with logic or empathy, not {0}")]
    NotAFearAttribute(String),

    #[error("Not a number: {0}")]
    NotANumber(String),

    #[error("Unknown command: {0}. Type help for help.")]
    UnknownCommand(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Status,
    Roll { skill: Skill, modifier: i32 },
    Attr { attribute: Attribute, modifier: i32 },
    Fear { resist: ResistWith, fear: u32, companions: u32 },
    Push,
    Close,
    Toggle(String),
    History,
    Hq,
    Buy(String),
    Dp(i64),
    Xp(i64),
    Save(Option<PathBuf>),
    Help,
    Quit,
}

fn number<T: std::str::FromStr>(arg: Option<&&str>, default: T) -> Result<T, CommandError> {
    match arg {
        None => Ok(default),
        Some(s) => s.parse().map_err(|_| CommandError::NotANumber(s.to_string())),
    }
}

/// Split a skill name (possibly two words) from a trailing number.
fn split_trailing_number<'a>(args: &[&'a str]) -> (String, Option<&'a str>) {
    match args.split_last() {
        Some((last, rest)) if !rest.is_empty() && last.parse::<i64>().is_ok() => {
            (rest.join(" "), Some(*last))
        }
        _ => (args.join(" "), None),
    }
}

pub fn parse_command(line: &str) -> Result<Command, CommandError> {
    let parts: Vec<&str> = line.split_whitespace().collect();
    let Some((&verb, args)) = parts.split_first() else {
        return Err(CommandError::UnknownCommand(String::new()));
    };

    match verb.to_lowercase().as_str() {
        "status" => Ok(Command::Status),
        "roll" => {
            if args.is_empty() {
                return Err(CommandError::Usage("roll <skill> [modifier]"));
            }
            let (name, modifier) = split_trailing_number(args);
            let skill = Skill::from_name(&name).ok_or(CommandError::UnknownSkill(name))?;
            Ok(Command::Roll {
                skill,
                modifier: number(modifier.as_ref(), 0)?,
            })
        }
        "attr" => {
            let name = args.first().ok_or(CommandError::Usage("attr <attribute> [modifier]"))?;
            let attribute = Attribute::from_name(name)
                .ok_or_else(|| CommandError::UnknownAttribute(name.to_string()))?;
            Ok(Command::Attr {
                attribute,
                modifier: number(args.get(1), 0)?,
            })
        }
        "fear" => {
            const USAGE: &str = "fear <logic|empathy> <fear> [companions]";
            let (Some(name), Some(_)) = (args.first(), args.get(1)) else {
                return Err(CommandError::Usage(USAGE));
            };
            let resist = ResistWith::from_name(name)
                .ok_or_else(|| CommandError::NotAFearAttribute(name.to_string()))?;
            Ok(Command::Fear {
                resist,
                fear: number(args.get(1), 1)?,
                companions: number(args.get(2), 0)?,
            })
        }
        "push" => Ok(Command::Push),
        "close" => Ok(Command::Close),
        "toggle" => {
            if args.is_empty() {
                return Err(CommandError::Usage("toggle <condition>"));
            }
            Ok(Command::Toggle(args.join(" ")))
        }
        "history" => Ok(Command::History),
        "hq" => Ok(Command::Hq),
        "buy" => {
            let id = args.first().ok_or(CommandError::Usage("buy <upgrade-id>"))?;
            Ok(Command::Buy(id.to_string()))
        }
        "dp" => {
            let delta = args.first().ok_or(CommandError::Usage("dp <delta>"))?;
            Ok(Command::Dp(number(Some(delta), 0)?))
        }
        "xp" => {
            let delta = args.first().ok_or(CommandError::Usage("xp <delta>"))?;
            Ok(Command::Xp(number(Some(delta), 0)?))
        }
        "save" => Ok(Command::Save(args.first().map(PathBuf::from))),
        "help" => Ok(Command::Help),
        "quit" | "exit" => Ok(Command::Quit),
        other => Err(CommandError::UnknownCommand(other.to_string())),
    }
}

pub const HELP: &[&str] = &[
    "  status                                  - Show the character sheet",
    "  roll <skill> [mod]                      - Roll a skill test",
    "  attr <attribute> [mod]                  - Roll an attribute test",
    "  fear <logic|empathy> <fear> [companions] - Roll a fear test",
    "  push                                    - Push the last test (takes a condition)",
    "  close                                   - End the current roll",
    "  toggle <condition>                      - Flip a condition",
    "  history                                 - Show recent rolls",
    "  hq                                      - Show the headquarters",
    "  buy <upgrade-id>                        - Purchase an upgrade",
    "  dp <delta>                              - Add or remove Development Points",
    "  xp <delta>                              - Add or remove experience",
    "  save [path]                             - Save the campaign",
    "  help                                    - Show this help",
    "  quit                                    - Exit",
];

// ============================================================================
// Game
// ============================================================================

/// One loaded campaign and its dice engine.
pub struct HeadlessGame {
    pub campaign: Campaign,
    pub save_path: PathBuf,
    engine: DicePoolEngine<StdRng>,
    tables: &'static RulesTables,
}

fn kind_label(kind: ConditionKind) -> &'static str {
    match kind {
        ConditionKind::Physical => "physically",
        ConditionKind::Mental => "mentally",
    }
}

impl HeadlessGame {
    pub fn new(campaign: Campaign, save_path: PathBuf, config: &HeadlessConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self {
            campaign,
            save_path,
            engine: DicePoolEngine::new(&config.engine, rng),
            tables: &TABLES,
        }
    }

    /// Load the campaign named by `config`, or quick-start a new one.
    pub async fn start(config: &HeadlessConfig) -> Result<Self, HeadlessError> {
        if let Some(quick) = &config.quick_start {
            let mut rng = match config.seed {
                Some(seed) => StdRng::seed_from_u64(seed),
                None => StdRng::from_entropy(),
            };
            let campaign = quick_start_campaign(quick, &config.engine, &TABLES, &mut rng)?;
            let path = config
                .campaign_path
                .clone()
                .unwrap_or_else(|| campaign_save_path(DEFAULT_SAVE_DIR, &quick.name));
            return Ok(Self::new(campaign, path, config));
        }

        let path = config.campaign_path.clone().ok_or(HeadlessError::NoCampaign)?;
        let campaign = store::load_campaign(&path).await?;
        Ok(Self::new(campaign, path, config))
    }

    /// Run a command that needs no I/O and return its output lines.
    pub fn execute(&mut self, command: &Command) -> Vec<String> {
        match command {
            Command::Status => self.status(),
            Command::Roll { skill, modifier } => self.roll(Test::Skill(*skill), *modifier),
            Command::Attr {
                attribute,
                modifier,
            } => self.roll(Test::Attribute(*attribute), *modifier),
            Command::Fear {
                resist,
                fear,
                companions,
            } => {
                let result =
                    self.engine
                        .roll_fear(&self.campaign.character_data, *resist, *fear, *companions);
                let mut lines = vec![format!("[FEAR] {} dice {}", result.pool, result.roll)];
                lines.push(format!("[FEAR] {}", result.outcome));
                if let FearOutcome::Terrified {
                    conditions_required,
                } = result.outcome
                {
                    let available = BROKEN_THRESHOLD.saturating_sub(
                        self.campaign
                            .character_data
                            .active_conditions(ConditionKind::Mental),
                    );
                    if available < conditions_required {
                        lines.push(format!(
                            "[FEAR] Only {available} mental condition slots remain"
                        ));
                    }
                }
                lines
            }
            Command::Push => match self.engine.push(&mut self.campaign.character_data) {
                Ok(outcome) => vec![format!(
                    "[PUSH] Took {}. {}",
                    outcome.condition, outcome.roll
                )],
                Err(e) => vec![format!("[ERROR] {e}")],
            },
            Command::Close => {
                self.engine.close();
                vec!["[ROLL] Closed".to_string()]
            }
            Command::Toggle(name) => match self.campaign.character_data.toggle_condition(name) {
                Ok(active) => {
                    let state = if active { "active" } else { "healed" };
                    vec![format!("[CONDITION] {} is now {state}", name.trim())]
                }
                Err(e) => vec![format!("[ERROR] {e}")],
            },
            Command::History => {
                if self.engine.history().is_empty() {
                    return vec!["[HISTORY] No rolls yet.".to_string()];
                }
                self.engine
                    .history()
                    .iter()
                    .map(|entry| {
                        let pushed = if entry.pushed { " (Pushed)" } else { "" };
                        format!("[HISTORY] {}: {}{pushed}", entry.label, entry.roll)
                    })
                    .collect()
            }
            Command::Hq => self.headquarters(),
            Command::Buy(id) => {
                let hq = &mut self.campaign.headquarters_data;
                match hq.purchase(id, &self.campaign.character_data, self.tables) {
                    Ok(upgrade) => {
                        let name = upgrade.display_name();
                        vec![format!(
                            "[HQ] Purchased {name}. Development Points left: {}",
                            hq.development_points
                        )]
                    }
                    Err(e) => vec![format!("[ERROR] {e}")],
                }
            }
            Command::Dp(delta) => {
                let dp = self
                    .campaign
                    .headquarters_data
                    .adjust_development_points(*delta);
                vec![format!("[HQ] Development Points: {dp}")]
            }
            Command::Xp(delta) => {
                let xp = self.campaign.character_data.adjust_experience(*delta);
                vec![format!("[XP] {xp}")]
            }
            Command::Help => {
                let mut lines = vec!["[HELP]".to_string()];
                lines.extend(HELP.iter().map(|l| l.to_string()));
                lines
            }
            Command::Save(_) | Command::Quit => Vec::new(),
        }
    }

    fn roll(&mut self, test: Test, modifier: i32) -> Vec<String> {
        match self
            .engine
            .roll_test(&self.campaign.character_data, test, modifier)
        {
            Ok(result) => {
                let mut line = format!("[ROLL] {}: {} dice {}", result.test, result.pool, result.roll);
                if result.roll.rerollable() > 0 {
                    line.push_str(" (push available)");
                }
                vec![line]
            }
            Err(e) => vec![format!("[ERROR] {e}")],
        }
    }

    fn status(&self) -> Vec<String> {
        let c = &self.campaign.character_data;
        let attributes: Vec<String> = Attribute::all()
            .iter()
            .map(|a| format!("{a} {}", c.attribute(*a)))
            .collect();
        let skills: Vec<String> = c
            .skills
            .iter()
            .filter(|(_, v)| *v > 0)
            .map(|(s, v)| format!("{s} {v}"))
            .collect();
        let active: Vec<&str> = c
            .conditions
            .iter()
            .filter(|cond| cond.active)
            .map(|cond| cond.name.as_str())
            .collect();

        let mut lines = vec![
            "[STATUS]".to_string(),
            format!("  Name: {} ({}, {})", c.name, c.archetype.name, c.age),
            format!("  Attributes: {}", attributes.join(", ")),
            format!("  Skills: {}", skills.join(", ")),
            format!("  Talents: {}", c.talents.join(", ")),
            format!("  Resources: {}  XP: {}", c.resources, c.xp),
            format!(
                "  Conditions: {}",
                if active.is_empty() {
                    "none".to_string()
                } else {
                    active.join(", ")
                }
            ),
        ];
        for kind in [ConditionKind::Physical, ConditionKind::Mental] {
            if c.is_broken(kind) {
                lines.push(format!("  Broken {}", kind_label(kind)));
            }
        }
        if !c.defects.is_empty() {
            let names: Vec<_> = c.defects.iter().map(|d| d.name.as_str()).collect();
            lines.push(format!("  Defects: {}", names.join(", ")));
        }
        if !c.insights.is_empty() {
            let names: Vec<_> = c.insights.iter().map(|i| i.name.as_str()).collect();
            lines.push(format!("  Insights: {}", names.join(", ")));
        }
        lines
    }

    fn headquarters(&self) -> Vec<String> {
        let hq = &self.campaign.headquarters_data;
        let character = &self.campaign.character_data;
        let mut lines = vec![format!(
            "[HQ] {} (Development Points: {})",
            hq.name, hq.development_points
        )];

        let purchased: Vec<String> = hq.purchased().iter().map(|u| u.display_name()).collect();
        if !purchased.is_empty() {
            lines.push(format!("  Owned: {}", purchased.join(", ")));
        }

        for upgrade in hq.available(character, self.tables) {
            let Some(status) = hq.status(&upgrade.id, character, self.tables) else {
                continue;
            };
            let mark = if status.purchasable {
                "*"
            } else if !status.prerequisite_met {
                "x"
            } else {
                "$"
            };
            lines.push(format!(
                "  {mark} {} [{}] {} DP, requires {}",
                upgrade.display_name(),
                upgrade.id,
                upgrade.cost,
                upgrade.prerequisite
            ));
        }

        for warning in hq.integrity_warnings(self.tables) {
            let IntegrityWarning::UnknownUpgrade {
                upgrade_id,
                referenced,
            } = warning;
            lines.push(format!(
                "[WARN] {upgrade_id} requires unknown upgrade {referenced}"
            ));
        }
        lines
    }
}

/// Run the game loop over stdin.
pub async fn run_headless(config: HeadlessConfig) -> Result<(), HeadlessError> {
    let mut game = HeadlessGame::start(&config).await?;

    println!("=== Vaesen Headless Mode ===");
    for line in game.execute(&Command::Status) {
        println!("{line}");
    }
    println!();
    println!("Commands:");
    for line in HELP {
        println!("{line}");
    }
    println!();

    let stdin = io::stdin();
    let mut stdout = io::stdout();

    for line in stdin.lock().lines() {
        let line = match line {
            Ok(l) => l,
            Err(e) => {
                eprintln!("Error reading input: {e}");
                break;
            }
        };

        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        match parse_command(line) {
            Ok(Command::Quit) => {
                println!("Goodbye!");
                break;
            }
            Ok(Command::Save(path)) => {
                let path = path.unwrap_or_else(|| game.save_path.clone());
                match store::save_campaign(&game.campaign, &path).await {
                    Ok(()) => println!("[SAVED] Campaign saved to {}", path.display()),
                    Err(e) => println!("[ERROR] Save failed: {e}"),
                }
            }
            Ok(command) => {
                for out in game.execute(&command) {
                    println!("{out}");
                }
            }
            Err(e) => println!("[ERROR] {e}"),
        }
        stdout.flush().ok();
    }

    Ok(())
}
