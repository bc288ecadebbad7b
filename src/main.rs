use clap::{error::ErrorKind, CommandFactory, Parser};
use crossterm::{
    event::{DisableFocusChange, EnableFocusChange},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    tty::IsTty,
};
use keysprint::{
    app::App,
    config::{Config, ConfigStore, FileConfigStore, Mode},
    controls::{handle_event, Flow},
    logging,
    runtime::{CrosstermEventSource, FixedTicker, Runner, TICK_RATE_MS},
    text_provider::{FixedText, PassageProvider, SentenceProvider, TextError, TextProvider},
    ui,
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};
use std::{
    error::Error,
    io::{self, stdin},
    path::PathBuf,
    time::{Duration, Instant},
};

/// typing-speed practice in the terminal with live wpm and accuracy
#[derive(Parser, Debug, Clone)]
#[clap(
    version,
    about,
    long_about = "Type through practice passages and get words-per-minute and accuracy as you go. The clock only runs while you are typing and the terminal has focus."
)]
pub struct Cli {
    /// custom text to practice
    #[clap(short = 'p', long)]
    prompt: Option<String>,

    /// practice this many generated sentences instead of passages
    #[clap(short = 's', long)]
    sentences: Option<usize>,

    /// live counter shown above the text
    #[clap(short = 'm', long, value_enum)]
    mode: Option<Mode>,

    /// compare letters case sensitively (overrides the saved setting)
    #[clap(long)]
    case_sensitive: Option<bool>,

    /// show wpm, accuracy and typos while typing (overrides the saved setting)
    #[clap(long)]
    realtime_stats: Option<bool>,

    /// write logs to this file instead of the default state directory
    #[clap(long)]
    log_file: Option<PathBuf>,
}

impl Cli {
    /// Layer command line overrides on top of the saved config
    fn apply(&self, mut config: Config) -> Config {
        if let Some(mode) = self.mode {
            config.mode = mode;
        }
        if let Some(case_sensitive) = self.case_sensitive {
            config.case_sensitive = case_sensitive;
        }
        if let Some(realtime_stats) = self.realtime_stats {
            config.show_realtime_stats = realtime_stats;
        }
        config
    }

    fn text_provider(&self) -> Result<Box<dyn TextProvider>, TextError> {
        if let Some(ref prompt) = self.prompt {
            let text = FixedText::new(prompt);
            if text.is_empty() {
                return Err(TextError::Empty("prompt".to_string()));
            }
            return Ok(Box::new(text));
        }
        if let Some(count) = self.sentences {
            return Ok(Box::new(SentenceProvider::new(count)));
        }
        Ok(Box::new(PassageProvider::english()?))
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    if !stdin().is_tty() {
        let mut cmd = Cli::command();
        cmd.error(ErrorKind::Io, "stdin must be a tty").exit();
    }

    // logging is best effort; the app works without it
    let _log_guard = cli
        .log_file
        .clone()
        .or_else(logging::default_log_path)
        .and_then(|path| logging::init(&path).ok());

    let store = FileConfigStore::new();
    let config = cli.apply(store.load());
    let mut app = App::new(config, cli.text_provider()?);

    enable_raw_mode()?;

    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableFocusChange)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = start_tui(&mut terminal, &mut app, &store);

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        DisableFocusChange,
        LeaveAlternateScreen
    )?;
    terminal.show_cursor()?;

    result
}

fn start_tui<B: Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    store: &dyn ConfigStore,
) -> Result<(), Box<dyn Error>> {
    let runner = Runner::new(
        CrosstermEventSource::new(),
        FixedTicker::new(Duration::from_millis(TICK_RATE_MS)),
    );

    terminal.draw(|f| ui::draw(app, f))?;

    loop {
        let event = runner.step();
        if handle_event(app, event, Instant::now(), store) == Flow::Quit {
            break;
        }

        terminal.draw(|f| ui::draw(app, f))?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_default_values() {
        let cli = Cli::parse_from(["keysprint"]);

        assert_eq!(cli.prompt, None);
        assert_eq!(cli.sentences, None);
        assert_eq!(cli.mode, None);
        assert_eq!(cli.case_sensitive, None);
        assert_eq!(cli.realtime_stats, None);
        assert_eq!(cli.log_file, None);
    }

    #[test]
    fn test_cli_custom_prompt() {
        let cli = Cli::parse_from(["keysprint", "-p", "hello world"]);
        assert_eq!(cli.prompt, Some("hello world".to_string()));

        let mut provider = cli.text_provider().unwrap();
        assert_eq!(provider.random_text(), "hello world");
    }

    #[test]
    fn test_cli_prompt_whitespace_is_collapsed() {
        let cli = Cli::parse_from(["keysprint", "-p", "  hello   world "]);
        let mut provider = cli.text_provider().unwrap();

        assert_eq!(provider.random_text(), "hello world");
    }

    #[test]
    fn test_cli_blank_prompt_is_rejected() {
        let cli = Cli::parse_from(["keysprint", "-p", "   "]);

        assert!(matches!(cli.text_provider(), Err(TextError::Empty(_))));
    }

    #[test]
    fn test_cli_mode() {
        let cli = Cli::parse_from(["keysprint", "-m", "words"]);
        assert_eq!(cli.mode, Some(Mode::Words));

        let cli = Cli::parse_from(["keysprint", "--mode", "zen"]);
        assert_eq!(cli.mode, Some(Mode::Zen));
    }

    #[test]
    fn test_cli_rejects_unknown_mode() {
        assert!(Cli::try_parse_from(["keysprint", "--mode", "marathon"]).is_err());
    }

    #[test]
    fn test_cli_overrides_saved_config() {
        let cli = Cli::parse_from([
            "keysprint",
            "--case-sensitive",
            "true",
            "--realtime-stats",
            "false",
        ]);
        let config = cli.apply(Config::default());

        assert_eq!(config.mode, Mode::Time);
        assert!(config.case_sensitive);
        assert!(!config.show_realtime_stats);
    }

    #[test]
    fn test_cli_without_overrides_keeps_saved_config() {
        let saved = Config {
            mode: Mode::Zen,
            case_sensitive: true,
            show_realtime_stats: false,
        };
        let cli = Cli::parse_from(["keysprint"]);

        assert_eq!(cli.apply(saved.clone()), saved);
    }

    #[test]
    fn test_cli_sentences_provider() {
        let cli = Cli::parse_from(["keysprint", "--sentences", "2"]);
        let mut provider = cli.text_provider().unwrap();

        assert!(!provider.random_text().is_empty());
    }

    #[test]
    fn test_cli_default_provider_uses_passages() {
        let cli = Cli::parse_from(["keysprint"]);
        let mut provider = cli.text_provider().unwrap();

        assert!(!provider.random_text().is_empty());
    }
}
