use async_channel::TryRecvError;
use clap::{Parser, Subcommand};
use keytap::{CommandSink, KeySink, LogSink};
use ringtype::config::{self, Config};
use ringtype::corpus::{CorpusSink, CorpusStore};
use ringtype::events::AppEvent;
use ringtype::predict::Predictor;
use ringtype::selector::RadialSelector;
use ringtype::sentence::SentenceBuffer;
use ringtype::session::Session;
use ringtype::sys::gamepad::GamepadInput;
use ringtype::sys::runtime;
use ringtype::sys::writer::CorpusWriter;
use std::thread;
use std::time::{Duration, Instant};

const FRAME: Duration = Duration::from_millis(16);

#[derive(Parser, Debug)]
#[command(name = "ringtype", version, about = "Type with a game controller", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Log keystrokes instead of injecting them
    #[arg(short = 'n', long)]
    dry_run: bool,
}

#[derive(Subcommand, Debug, Clone)]
enum Commands {
    /// Run the controller loop (default).
    Run,
    /// Print the suggestion for some typed text, e.g. `ringtype suggest "good "`.
    Suggest { text: Vec<String> },
    /// Print config and corpus file locations.
    Paths,
    /// Write the default config file if none exists.
    InitConfig,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    let config = config::load_or_default();

    match cli.command.unwrap_or(Commands::Run) {
        Commands::Run => run(config, cli.dry_run),
        Commands::Suggest { text } => suggest(&config, &text.join(" ")),
        Commands::Paths => {
            let store = CorpusStore::new(config::get_data_dir(&config)?);
            println!("config:    {}", config::get_config_path()?.display());
            println!("sentences: {}", store.sentences_path().display());
            println!("raw text:  {}", store.raw_text_path().display());
            Ok(())
        }
        Commands::InitConfig => {
            println!("{}", config::write_default_config()?.display());
            Ok(())
        }
    }
}

fn load_predictor(config: &Config) -> anyhow::Result<(CorpusStore, Predictor)> {
    let mut store = CorpusStore::new(config::get_data_dir(config)?);
    let corpus = store.load()?;
    let predictor = Predictor::from_corpus(config.predictor, &corpus);
    Ok((store, predictor))
}

fn suggest(config: &Config, text: &str) -> anyhow::Result<()> {
    let (_, mut predictor) = load_predictor(config)?;
    let suggestion = predictor.recompute(&SentenceBuffer::from_text(text));
    println!("{}", suggestion.text);
    Ok(())
}

fn run(mut config: Config, dry_run: bool) -> anyhow::Result<()> {
    let (store, predictor) = load_predictor(&config)?;
    let selector = RadialSelector::new(config.layout_or_default(), config.selector);

    let (tx, rx) = async_channel::bounded(32);
    let (corpus, writer): (Box<dyn CorpusSink>, _) = if config.storage.background_writes {
        let (writer, writer_rx) = CorpusWriter::channel();
        (Box::new(writer) as Box<dyn CorpusSink>, Some((store, writer_rx)))
    } else {
        (Box::new(store) as Box<dyn CorpusSink>, None)
    };
    let drains_writer = writer.is_some();

    // Start Background Services
    let services = runtime::start_background_services(tx, writer)?;

    let mut keys: Box<dyn KeySink> = if dry_run || config.keys.dry_run {
        Box::new(LogSink)
    } else {
        Box::new(CommandSink::new(
            config.keys.type_command.clone(),
            config.keys.key_command.clone(),
        ))
    };

    let mut gamepad = GamepadInput::new()?;
    if !gamepad.is_connected() {
        log::warn!("No gamepad connected, waiting for one");
    }

    let mut session = Session::new(selector, predictor, corpus);
    let mut shown = session.suggestion().text.clone();
    log::info!("Ready, suggestion: '{}'", shown);

    'frames: loop {
        loop {
            match rx.try_recv() {
                Ok(AppEvent::Quit) | Err(TryRecvError::Closed) => break 'frames,
                Ok(AppEvent::ConfigReload) => match config::load_config() {
                    Ok(new_config) => {
                        for section in config.restart_sections(&new_config) {
                            log::warn!("[{}] changed, restart ringtype to apply it", section);
                        }
                        session.apply_config(&new_config);
                        config = new_config;
                        log::info!("Configuration reloaded");
                    }
                    Err(e) => log::error!("Failed to reload config: {}", e),
                },
                Err(TryRecvError::Empty) => break,
            }
        }

        let frame = gamepad.poll();
        let output = session.tick(&frame, Instant::now());
        for stroke in &output.keystrokes {
            if let Err(e) = keys.send(stroke) {
                log::warn!("Failed to inject {:?}: {}", stroke, e);
            }
        }

        if output.suggestion.text != shown {
            shown = output.suggestion.text;
            log::info!("Suggestion: '{}' ({})", shown, output.suggestion.source);
        }

        thread::sleep(FRAME);
    }

    log::info!("Shutting down");
    drop(session);
    if drains_writer && services.join().is_err() {
        log::error!("Background services panicked");
    }
    Ok(())
}
