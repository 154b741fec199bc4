use clap::{Parser, Subcommand};
use keytap::{CommandSink, CommandTemplate, KeySink, Keystroke, LogSink, NamedKey};
use std::str::FromStr;

#[derive(Parser, Debug)]
#[command(name = "keytap", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Command used to type literal text ('{}' is replaced by the text)
    #[arg(long, default_value = "xdotool type --clearmodifiers -- {}")]
    type_command: String,

    /// Command used to press a named key ('{}' is replaced by the keysym)
    #[arg(long, default_value = "xdotool key --clearmodifiers {}")]
    key_command: String,

    /// Log keystrokes instead of injecting them
    #[arg(short = 'n', long)]
    dry_run: bool,
}

#[derive(Subcommand, Debug, Clone)]
enum Commands {
    /// Type literal text into the focused window.
    Type { text: String },
    /// Press one or more named keys (backspace, enter, up, down, left, right).
    Key {
        #[arg(required = true)]
        names: Vec<String>,
    },
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let strokes = match cli.command {
        Commands::Type { text } => vec![Keystroke::Text(text)],
        Commands::Key { names } => names
            .iter()
            .map(|name| {
                NamedKey::from_str(name)
                    .map(Keystroke::Key)
                    .map_err(|_| anyhow::anyhow!("Unknown key name '{}'", name))
            })
            .collect::<anyhow::Result<Vec<_>>>()?,
    };

    if cli.dry_run {
        LogSink.send_all(&strokes)?;
    } else {
        CommandSink::new(
            CommandTemplate::new(cli.type_command),
            CommandTemplate::new(cli.key_command),
        )
        .send_all(&strokes)?;
    }
    Ok(())
}
