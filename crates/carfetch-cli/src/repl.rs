//! Interactive REPL for carfetch.
//!
//! Launch with `carfetch repl`. `/callback`, `/promise` and `/async` each
//! run one orchestrator and print the output slot. Every run writes the same
//! slot, so `/show` always prints whatever finished last.

use rustyline::completion::{Completer, Pair};
use rustyline::config::CompletionType;
use rustyline::error::ReadlineError;
use rustyline::highlight::Highlighter;
use rustyline::hint::Hinter;
use rustyline::validate::Validator;
use rustyline::{
    Cmd, ConditionalEventHandler, Config, Editor, Event, EventContext, EventHandler, Helper,
    KeyEvent, RepeatCount,
};
use tokio::runtime::Handle;

use carfetch::{DecodePolicy, FetchMethod, Outcome, RenderTarget};

use crate::config::Settings;

/// Available REPL commands.
const COMMANDS: &[(&str, &str)] = &[
    ("/callback", "Fetch using a callback continuation"),
    ("/promise", "Fetch using a promise chain"),
    ("/async", "Fetch using async/await"),
    ("/show", "Print the current output"),
    ("/base", "Show or set the base URL"),
    ("/policy", "Show or set the decode policy"),
    ("/clear", "Clear the screen"),
    ("/help", "Show available commands"),
    ("/exit", "Quit the REPL"),
];

const POLICIES: &[&str] = &["strict", "skip", "lenient"];

/// REPL helper for tab completion.
#[derive(Default)]
struct CarfetchHelper;

impl Completer for CarfetchHelper {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &rustyline::Context<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        let input = &line[..pos];

        if !input.contains(' ') {
            let matches: Vec<Pair> = COMMANDS
                .iter()
                .filter(|(cmd, _)| cmd.starts_with(input))
                .map(|(cmd, desc)| Pair {
                    display: format!("{cmd:<12} {desc}"),
                    replacement: format!("{cmd} "),
                })
                .collect();
            return Ok((0, matches));
        }

        if let Some(args) = input.strip_prefix("/policy ") {
            let prefix_start = input.len() - args.len();
            let matches: Vec<Pair> = POLICIES
                .iter()
                .filter(|p| p.starts_with(args.trim()))
                .map(|p| Pair {
                    display: p.to_string(),
                    replacement: p.to_string(),
                })
                .collect();
            return Ok((prefix_start, matches));
        }

        Ok((pos, Vec::new()))
    }
}

impl Hinter for CarfetchHelper {
    type Hint = String;

    fn hint(&self, line: &str, pos: usize, _ctx: &rustyline::Context<'_>) -> Option<String> {
        if pos < line.len() || line.is_empty() {
            return None;
        }
        if line.starts_with('/') && !line.contains(' ') {
            for (cmd, _) in COMMANDS {
                if cmd.starts_with(line) && *cmd != line {
                    return Some(cmd[line.len()..].to_string());
                }
            }
        }
        None
    }
}

impl Highlighter for CarfetchHelper {}
impl Validator for CarfetchHelper {}
impl Helper for CarfetchHelper {}

struct TabCompleteOrAcceptHint;

impl ConditionalEventHandler for TabCompleteOrAcceptHint {
    fn handle(
        &self,
        _evt: &Event,
        _n: RepeatCount,
        _positive: bool,
        ctx: &EventContext<'_>,
    ) -> Option<Cmd> {
        if ctx.has_hint() {
            Some(Cmd::CompleteHint)
        } else {
            Some(Cmd::Complete)
        }
    }
}

/// What a parsed line asks for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplCommand {
    Fetch(FetchMethod),
    Show,
    Base(Option<String>),
    Policy(Option<String>),
    Clear,
    Help,
    Exit,
    Unknown(String),
}

/// Parse one input line. Blank lines yield `None`.
pub fn parse_command(line: &str) -> Option<ReplCommand> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }

    let input = line.strip_prefix('/').unwrap_or(line);
    if input.is_empty() {
        return Some(ReplCommand::Help);
    }

    let mut parts = input.splitn(2, ' ');
    let cmd = parts.next().unwrap_or("");
    let args = parts.next().map(str::trim).filter(|a| !a.is_empty());

    let command = match cmd {
        "callback" | "cb" => ReplCommand::Fetch(FetchMethod::Callback),
        "promise" | "p" => ReplCommand::Fetch(FetchMethod::Promise),
        "async" | "await" | "a" => ReplCommand::Fetch(FetchMethod::AsyncAwait),
        "show" | "output" => ReplCommand::Show,
        "base" => ReplCommand::Base(args.map(str::to_string)),
        "policy" => ReplCommand::Policy(args.map(str::to_string)),
        "clear" | "cls" => ReplCommand::Clear,
        "help" | "h" | "?" => ReplCommand::Help,
        "exit" | "quit" => ReplCommand::Exit,
        other => ReplCommand::Unknown(other.to_string()),
    };
    Some(command)
}

/// Session state.
pub struct ReplState {
    pub settings: Settings,
    pub target: RenderTarget,
}

impl ReplState {
    pub fn new(settings: Settings) -> Self {
        Self {
            settings,
            target: RenderTarget::new(),
        }
    }

    /// Run one orchestrator against the current settings.
    pub async fn fetch(&self, method: FetchMethod) -> Outcome {
        self.settings
            .pipeline(self.target.clone())
            .run(method)
            .await
    }

    /// Update or report the decode policy. Returns the line to print.
    pub fn set_policy(&mut self, name: Option<&str>) -> String {
        match name.map(str::parse::<DecodePolicy>) {
            None => format!("Decode policy: {}", self.settings.policy),
            Some(Ok(policy)) => {
                self.settings.policy = policy;
                format!("Decode policy set to {policy}")
            }
            Some(Err(e)) => e,
        }
    }

    /// Update or report the base URL. Returns the line to print.
    pub fn set_base(&mut self, url: Option<&str>) -> String {
        match url {
            None => format!("Base URL: {}", self.settings.base_url),
            Some(url) => {
                self.settings.base_url = url.to_string();
                format!("Base URL set to {url}")
            }
        }
    }
}

/// Run the interactive REPL.
///
/// Blocks the calling thread; fetches are driven on `runtime`. Call it from a
/// blocking task, not from inside an async context.
pub fn run(settings: Settings, runtime: Handle) -> anyhow::Result<()> {
    eprintln!("carfetch v{}", env!("CARGO_PKG_VERSION"));
    eprintln!("Base URL: {}", settings.base_url);
    eprintln!("Type /help for commands, /exit to quit.");

    let config = Config::builder()
        .history_ignore_space(true)
        .auto_add_history(true)
        .completion_type(CompletionType::List)
        .completion_prompt_limit(20)
        .build();

    let mut rl: Editor<CarfetchHelper, rustyline::history::DefaultHistory> =
        Editor::with_config(config)?;
    rl.set_helper(Some(CarfetchHelper));
    rl.bind_sequence(
        KeyEvent::from('\t'),
        EventHandler::Conditional(Box::new(TabCompleteOrAcceptHint)),
    );

    let home = std::env::var("HOME")
        .or_else(|_| std::env::var("USERPROFILE"))
        .unwrap_or_else(|_| ".".to_string());
    let hist_path = std::path::PathBuf::from(&home).join(".carfetch_history");
    if hist_path.exists() {
        let _ = rl.load_history(&hist_path);
    }

    let mut state = ReplState::new(settings);
    let prompt = "carfetch> ";

    loop {
        match rl.readline(prompt) {
            Ok(line) => {
                let Some(command) = parse_command(&line) else {
                    continue;
                };

                match command {
                    ReplCommand::Exit => break,
                    ReplCommand::Help => cmd_help(),
                    ReplCommand::Clear => eprint!("\x1b[2J\x1b[H"),
                    ReplCommand::Fetch(method) => cmd_fetch(&state, method, &runtime),
                    ReplCommand::Show => cmd_show(&state),
                    ReplCommand::Base(url) => eprintln!("  {}", state.set_base(url.as_deref())),
                    ReplCommand::Policy(name) => {
                        eprintln!("  {}", state.set_policy(name.as_deref()))
                    }
                    ReplCommand::Unknown(cmd) => {
                        eprintln!("  Unknown command '/{cmd}'. Type /help for commands.");
                    }
                }
            }
            Err(ReadlineError::Interrupted) => {
                eprintln!("  Type /exit to quit.");
            }
            Err(ReadlineError::Eof) => break,
            Err(err) => {
                eprintln!("  Error: {err}");
                break;
            }
        }
    }

    let _ = rl.save_history(&hist_path);

    Ok(())
}

fn cmd_help() {
    eprintln!();
    eprintln!("  Commands:");
    eprintln!();
    for (cmd, desc) in COMMANDS {
        eprintln!("    {cmd:<12} {desc}");
    }
    eprintln!();
    eprintln!("  Tip: /policy completes strict, skip and lenient.");
    eprintln!();
}

fn cmd_fetch(state: &ReplState, method: FetchMethod, runtime: &Handle) {
    if let Outcome::Rendered { rows } = runtime.block_on(state.fetch(method)) {
        eprintln!("  {method}: {rows} cars above 25 MPG");
    }
    cmd_show(state);
}

fn cmd_show(state: &ReplState) {
    if state.target.is_empty() {
        eprintln!("  (nothing fetched yet)");
    } else {
        println!("{}", state.target.contents());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state() -> ReplState {
        ReplState::new(Settings {
            base_url: "http://127.0.0.1:3100/".to_string(),
            policy: DecodePolicy::Strict,
        })
    }

    #[test]
    fn test_parse_buttons() {
        assert_eq!(
            parse_command("/callback"),
            Some(ReplCommand::Fetch(FetchMethod::Callback))
        );
        assert_eq!(
            parse_command("promise"),
            Some(ReplCommand::Fetch(FetchMethod::Promise))
        );
        assert_eq!(
            parse_command(" /async "),
            Some(ReplCommand::Fetch(FetchMethod::AsyncAwait))
        );
    }

    #[test]
    fn test_parse_args_and_blanks() {
        assert_eq!(parse_command("   "), None);
        assert_eq!(parse_command("/"), Some(ReplCommand::Help));
        assert_eq!(parse_command("/base"), Some(ReplCommand::Base(None)));
        assert_eq!(
            parse_command("/policy  skip "),
            Some(ReplCommand::Policy(Some("skip".to_string())))
        );
        assert_eq!(
            parse_command("/xhr"),
            Some(ReplCommand::Unknown("xhr".to_string()))
        );
    }

    #[test]
    fn test_set_policy() {
        let mut s = state();
        assert_eq!(s.set_policy(None), "Decode policy: strict");
        assert_eq!(s.set_policy(Some("lenient")), "Decode policy set to lenient");
        assert_eq!(s.settings.policy, DecodePolicy::Lenient);
        assert!(s.set_policy(Some("loose")).starts_with("unknown decode policy"));
        assert_eq!(s.settings.policy, DecodePolicy::Lenient);
    }

    #[test]
    fn test_set_base() {
        let mut s = state();
        assert_eq!(s.set_base(Some("http://cars.test/")), "Base URL set to http://cars.test/");
        assert_eq!(s.set_base(None), "Base URL: http://cars.test/");
    }

    #[tokio::test]
    async fn test_fetch_with_bad_base_renders_error() {
        let mut s = state();
        s.set_base(Some("not a url"));
        assert!(!s.fetch(FetchMethod::Promise).await.is_success());
        assert!(s
            .target
            .contents()
            .starts_with("<p style=\"color: red;\">Error: Invalid resource URL"));
    }

    #[test]
    fn test_hint_completes_command() {
        let history = rustyline::history::DefaultHistory::new();
        let ctx = rustyline::Context::new(&history);
        let helper = CarfetchHelper;
        assert_eq!(helper.hint("/pro", 4, &ctx), Some("mise".to_string()));
        assert_eq!(helper.hint("/promise", 8, &ctx), None);
        assert_eq!(helper.hint("promise", 7, &ctx), None);
    }

    #[test]
    fn test_complete_policy_names() {
        let history = rustyline::history::DefaultHistory::new();
        let ctx = rustyline::Context::new(&history);
        let (start, pairs) = CarfetchHelper.complete("/policy s", 9, &ctx).unwrap();
        assert_eq!(start, "/policy ".len());
        let names: Vec<_> = pairs.iter().map(|p| p.replacement.as_str()).collect();
        assert_eq!(names, ["strict", "skip"]);
    }
}
