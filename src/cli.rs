//! Command tree, command execution and the interactive prompt.
//!
//! Every command runs against a [`Session`] and returns the text to show the
//! user. Commands that change the tracker save it before returning.

use crate::config::Config;
use crate::errors::{TrackerError, TrackerResult};
use crate::pokedex::{Pokedex, SpeciesLookup};
use crate::pokemon::TrackedPokemon;
use crate::storage::Storage;
use crate::tracker::Tracker;
use clap::{Args, Parser, Subcommand};
use schema::{EvPatch, RulePolicy, Stat};
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

const PROMPT: &str = ">> ";

/// Largest `--count` accepted by `battle` and `vitamin`.
pub const MAX_COUNT: i64 = 10_000;

/// A small utility for keeping track of Effort Values while training Pokemon.
#[derive(Parser, Debug)]
#[command(name = "ev-tracker", version, long_about = None)]
pub struct Cli {
    /// Location of the tracker file. Defaults to the one named in the config
    #[arg(long, short = 'i')]
    pub infile: Option<PathBuf>,

    /// Location of the config file
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Command to run. Starts an interactive prompt when omitted
    #[command(subcommand)]
    pub command: Option<Command>,
}

/// One line typed at the interactive prompt.
#[derive(Parser, Debug)]
#[command(name = "ev-tracker", no_binary_name = true, disable_version_flag = true)]
pub struct ReplLine {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Command {
    /// List Effort Values for a Pokemon
    Ev {
        /// Name or number of the species to search for
        species: String,
    },

    /// List tracked Pokemon
    List,

    /// Add a Pokemon to track
    Track(TrackArgs),

    /// List the active team Pokemon
    Team {
        #[arg(long)]
        detailed: bool,
    },

    /// List the boxed Pokemon
    #[command(name = "box")]
    Boxed {
        #[arg(long)]
        detailed: bool,
    },

    /// Send a Pokemon from the team to the box
    Deposit { id: u32 },

    /// Send a Pokemon from the box to the team
    Withdraw { id: u32 },

    /// Show the status of the chosen Pokemon
    Status { id: u32 },

    /// Update a tracked Pokemon's details
    Update(UpdateArgs),

    /// Apply a consumable item to a Pokemon
    Vitamin(VitaminArgs),

    /// Update a tracked Pokemon's effort values
    #[command(alias = "set_effort")]
    SetEffort(EffortArgs),

    /// Update a tracked Pokemon's target effort values
    #[command(alias = "set_target")]
    SetTarget(EffortArgs),

    /// Clear a tracked Pokemon's target effort values
    #[command(alias = "clear_target")]
    ClearTarget { id: u32 },

    /// Record a battle for the team or the given Pokemon
    Battle(BattleArgs),

    /// Stop tracking a Pokemon
    Release { id: u32 },

    /// Show or change the generation rules
    Config(ConfigArgs),
}

#[derive(Args, Debug, Clone, PartialEq)]
pub struct TrackArgs {
    /// Name or number of the species to track
    pub species: String,

    /// Nickname of the Pokemon
    #[arg(long, short = 'n')]
    pub name: Option<String>,

    /// The Pokemon has Pokerus
    #[arg(long, short = 'p')]
    pub pokerus: bool,

    /// Held item
    #[arg(long, short = 'i')]
    pub item: Option<String>,
}

#[derive(Args, Debug, Clone, PartialEq)]
pub struct UpdateArgs {
    pub id: u32,

    /// Name or number of the new species
    #[arg(long)]
    pub species: Option<String>,

    #[arg(long, short = 'n', conflicts_with = "noname")]
    pub name: Option<String>,

    /// Remove the nickname
    #[arg(long)]
    pub noname: bool,

    #[arg(long, short = 'p', conflicts_with = "nopokerus")]
    pub pokerus: bool,

    #[arg(long)]
    pub nopokerus: bool,

    #[arg(long, short = 'i', conflicts_with = "noitem")]
    pub item: Option<String>,

    /// Take away the held item
    #[arg(long)]
    pub noitem: bool,

    /// Take the Pokemon off the team
    #[arg(long, short = 'd', conflicts_with = "withdraw")]
    pub deposit: bool,

    /// Add the Pokemon to the team
    #[arg(long, short = 'w')]
    pub withdraw: bool,
}

#[derive(Args, Debug, Clone, PartialEq)]
pub struct VitaminArgs {
    pub id: u32,

    /// Consumable to apply
    pub vitamin: String,

    #[arg(long, short = 'c', default_value_t = 1, value_parser = clap::value_parser!(i32).range(1..=MAX_COUNT))]
    pub count: i32,
}

#[derive(Args, Debug, Clone, Default, PartialEq)]
pub struct EffortArgs {
    pub id: u32,

    #[arg(long)]
    pub hp: Option<i32>,

    #[arg(long)]
    pub attack: Option<i32>,

    #[arg(long)]
    pub defense: Option<i32>,

    #[arg(long, visible_alias = "special_attack")]
    pub special_attack: Option<i32>,

    #[arg(long, visible_alias = "special_defense")]
    pub special_defense: Option<i32>,

    #[arg(long)]
    pub speed: Option<i32>,
}

impl EffortArgs {
    pub fn patch(&self) -> EvPatch {
        let mut patch = EvPatch::new();
        patch.set(Stat::Hp, self.hp);
        patch.set(Stat::Attack, self.attack);
        patch.set(Stat::Defense, self.defense);
        patch.set(Stat::SpecialAttack, self.special_attack);
        patch.set(Stat::SpecialDefense, self.special_defense);
        patch.set(Stat::Speed, self.speed);
        patch
    }
}

#[derive(Args, Debug, Clone, PartialEq)]
pub struct BattleArgs {
    /// Name or number of the species battled
    pub species: String,

    /// Pokemon that took part. Defaults to the whole team
    #[arg(long = "id", short = 'i', value_delimiter = ',')]
    pub ids: Vec<u32>,

    #[arg(long, short = 'c', default_value_t = 1, value_parser = clap::value_parser!(i32).range(1..=MAX_COUNT))]
    pub count: i32,
}

#[derive(Args, Debug, Clone, Default, PartialEq)]
pub struct ConfigArgs {
    #[arg(long)]
    pub generation: Option<u8>,

    #[arg(long)]
    pub alternate_ruleset: Option<bool>,

    #[arg(long)]
    pub ignore_pokerus: Option<bool>,
}

/// Loaded configuration, pokedex and tracker for one run of the program.
pub struct Session {
    config: Config,
    config_path: PathBuf,
    pokedex: Box<dyn SpeciesLookup>,
    storage: Storage,
    tracker: Tracker,
}

impl Session {
    /// Load the config (writing it back with resolved values), the pokedex
    /// and the tracker file.
    pub fn open(config_path: &Path, infile: Option<&Path>) -> TrackerResult<Self> {
        let config = Config::load(config_path, infile)?;
        config.save(config_path)?;

        let pokedex = match &config.pokedex {
            Some(path) => Pokedex::load(path)?,
            None => Pokedex::embedded()?,
        };
        let storage = Storage::new(config.tracker_path());
        let tracker = storage.load(&pokedex)?;

        Ok(Self {
            config,
            config_path: config_path.to_path_buf(),
            pokedex: Box::new(pokedex),
            storage,
            tracker,
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn tracker(&self) -> &Tracker {
        &self.tracker
    }

    pub fn rules(&self) -> RulePolicy {
        self.config.rules()
    }

    fn save(&self) -> TrackerResult<()> {
        self.storage.save(&self.tracker)?;
        Ok(())
    }

    /// Run one command, returning the text to print.
    ///
    /// A command that fails, including one whose save fails, leaves the
    /// in-memory tracker as it was before the command ran.
    pub fn execute(&mut self, command: Command) -> TrackerResult<String> {
        tracing::debug!("Executing {:?}", command);
        let snapshot = self.tracker.clone();
        let result = self.dispatch(command);
        if let Err(e) = &result {
            tracing::debug!("Command failed, restoring tracker: {}", e);
            self.tracker = snapshot;
        }
        result
    }

    fn dispatch(&mut self, command: Command) -> TrackerResult<String> {
        match command {
            Command::Ev { species } => Ok(self.pokedex.search(&species)?.to_string()),
            Command::List => Ok(self.tracker.to_string()),
            Command::Track(args) => self.track(args),
            Command::Team { detailed } => {
                let ids: Vec<u32> = self.tracker.team().collect();
                self.listing(&ids, detailed)
            }
            Command::Boxed { detailed } => {
                let ids: Vec<u32> = self.tracker.boxed().collect();
                self.listing(&ids, detailed)
            }
            Command::Deposit { id } => {
                self.tracker.remove_from_team(id)?;
                self.save()?;
                Ok(self.tracker.get(id)?.to_string())
            }
            Command::Withdraw { id } => {
                self.tracker.add_to_team(id)?;
                self.save()?;
                Ok(self.tracker.get(id)?.to_string())
            }
            Command::Status { id } => self.status(id),
            Command::Update(args) => self.update(args),
            Command::Vitamin(args) => self.vitamin(args),
            Command::SetEffort(args) => {
                let pokemon = self.tracker.get_mut(args.id)?;
                pokemon.set_effort(&args.patch());
                self.save()?;
                let pokemon = self.tracker.get(args.id)?;
                Ok(format!("{} new EVs:\n{}", pokemon, pokemon.evs))
            }
            Command::SetTarget(args) => {
                let pokemon = self.tracker.get_mut(args.id)?;
                pokemon.set_target(&args.patch());
                self.save()?;
                let pokemon = self.tracker.get(args.id)?;
                Ok(format!(
                    "{} new target EVs:\n{}",
                    pokemon,
                    pokemon.evs.format(None, Some(&pokemon.target_evs))
                ))
            }
            Command::ClearTarget { id } => {
                self.tracker.get_mut(id)?.clear_target();
                self.save()?;
                let pokemon = self.tracker.get(id)?;
                Ok(format!("{} target EVs cleared.\n{}", pokemon, pokemon.evs))
            }
            Command::Battle(args) => self.battle(args),
            Command::Release { id } => {
                let pokemon = self.tracker.release(id)?;
                self.save()?;
                Ok(format!("No longer tracking {}", pokemon))
            }
            Command::Config(args) => self.configure(args),
        }
    }

    fn track(&mut self, args: TrackArgs) -> TrackerResult<String> {
        let species = self.pokedex.search(&args.species)?;
        let mut pokemon = TrackedPokemon::new(species);
        pokemon.rename(args.name.as_deref());
        pokemon.pokerus = args.pokerus;
        pokemon.set_item(args.item.as_deref())?;

        let id = self.tracker.track(pokemon);
        self.save()?;
        Ok(self.tracker.get(id)?.to_string())
    }

    fn listing(&self, ids: &[u32], detailed: bool) -> TrackerResult<String> {
        let entries = ids
            .iter()
            .map(|&id| {
                let pokemon = self.tracker.get(id)?;
                Ok(if detailed {
                    pokemon.status(None)
                } else {
                    pokemon.to_string()
                })
            })
            .collect::<TrackerResult<Vec<_>>>()?;
        Ok(entries.join("\n\n"))
    }

    fn status(&self, id: u32) -> TrackerResult<String> {
        let pokemon = self.tracker.get(id)?;
        Ok(pokemon.status(Some(self.tracker.location(id))))
    }

    /// Changes are made on a copy and only stored once every field has been
    /// validated.
    fn update(&mut self, args: UpdateArgs) -> TrackerResult<String> {
        let mut pokemon = self.tracker.get(args.id)?.clone();

        if let Some(query) = &args.species {
            pokemon.set_species(self.pokedex.search(query)?);
        }
        if args.pokerus {
            pokemon.pokerus = true;
        }
        if args.nopokerus {
            pokemon.pokerus = false;
        }
        if args.item.is_some() || args.noitem {
            pokemon.set_item(args.item.as_deref())?;
        }
        if args.noname {
            pokemon.clear_nickname();
        } else {
            pokemon.rename(args.name.as_deref());
        }

        *self.tracker.get_mut(args.id)? = pokemon;
        if args.deposit {
            self.tracker.remove_from_team(args.id)?;
        }
        if args.withdraw {
            self.tracker.add_to_team(args.id)?;
        }
        self.save()?;
        self.status(args.id)
    }

    fn vitamin(&mut self, args: VitaminArgs) -> TrackerResult<String> {
        let rules = self.rules();
        let (name, change) =
            self.tracker
                .use_consumable(args.id, &args.vitamin, args.count, &rules)?;
        self.save()?;

        let pokemon = self.tracker.get(args.id)?;
        Ok(format!(
            "Used {} × {}\n{} new EVs:\n{}",
            args.count,
            name,
            pokemon,
            pokemon
                .evs
                .format(Some(&change.applied), Some(&pokemon.target_evs))
        ))
    }

    fn battle(&mut self, args: BattleArgs) -> TrackerResult<String> {
        let rules = self.rules();
        let species = self.pokedex.search(&args.species)?;
        let changes = self
            .tracker
            .battle(&args.ids, &species, args.count, &rules)?;
        self.save()?;

        let mut output = vec![format!(
            "Battled {} × {} (#{}) which has a base EV reward of {}",
            args.count,
            species.display_name(),
            species.id,
            species.evs.as_modifier_string()
        )];
        for change in changes {
            let pokemon = self.tracker.get(change.pokemon_id)?;
            output.push(format!(
                "\n{} new EVs:\n{}",
                pokemon,
                pokemon
                    .evs
                    .format(Some(&change.applied), Some(&pokemon.target_evs))
            ));
        }
        Ok(output.join("\n"))
    }

    fn configure(&mut self, args: ConfigArgs) -> TrackerResult<String> {
        let mut config = self.config.clone();
        if let Some(generation) = args.generation {
            config.set_generation(generation)?;
        }
        if let Some(alternate_ruleset) = args.alternate_ruleset {
            config.alternate_ruleset = alternate_ruleset;
        }
        if let Some(ignore_pokerus) = args.ignore_pokerus {
            config.ignore_pokerus = ignore_pokerus;
        }

        if config != self.config {
            config.save(&self.config_path)?;
            tracing::info!("Rules changed to {:?}", config.rules());
            self.config = config;
        }
        Ok(self.config.to_string())
    }
}

/// The explanation printed when a command fails.
pub fn render_error(error: &TrackerError) -> String {
    let mut lines = match error {
        TrackerError::Storage(_) | TrackerError::Config(_) => vec![format!("Error: {}", error)],
        _ => vec![error.to_string()],
    };

    let candidates = error.candidates();
    if !candidates.is_empty() {
        lines.push("Did you mean:".to_string());
        lines.extend(candidates.iter().map(|candidate| format!("  {}", candidate)));
    }
    if matches!(error, TrackerError::NoActivePokemon) {
        lines.push("Add a pokemon to the team using the 'withdraw <id>' command.".to_string());
    }
    lines.join("\n")
}

/// Read commands from `input` until EOF or `exit`, writing results and errors
/// to `output`.
pub fn run_repl<R: BufRead, W: Write>(
    session: &mut Session,
    input: R,
    mut output: W,
) -> io::Result<()> {
    let mut lines = input.lines();
    loop {
        write!(output, "{}", PROMPT)?;
        output.flush()?;

        let Some(line) = lines.next() else {
            writeln!(output, "\nExiting...")?;
            return Ok(());
        };
        let line = line?;
        let line = line.trim();
        match line {
            "" => continue,
            "exit" | "quit" => return Ok(()),
            _ => {}
        }

        let Some(tokens) = shlex::split(line) else {
            writeln!(output, "Error: unbalanced quotes in '{}'", line)?;
            continue;
        };
        let command = match ReplLine::try_parse_from(tokens) {
            Ok(parsed) => parsed.command,
            Err(e) => {
                writeln!(output, "{}", e.to_string().trim_end())?;
                continue;
            }
        };

        match session.execute(command) {
            Ok(text) => writeln!(output, "{}\n", text)?,
            Err(e) => writeln!(output, "{}\n", render_error(&e))?,
        }
    }
}
