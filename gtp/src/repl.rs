//! The GTP read-eval-print loop.
//!
//! Implements the framing of the Go Text Protocol: commands arrive one per
//! line with an optional numeric id, replies start with `=` on success and
//! `?` on failure, and every reply ends with a blank line. Anything after
//! `#` is a comment.

use crate::session::{EngineSession, SessionError, PARAM_NAMES};
use engine_core::{Move, Player, Vertex};
use std::io::{BufRead, Write};
use tracing::debug;

/// Commands this engine understands.
const COMMANDS: &[&str] = &[
    "protocol_version",
    "name",
    "version",
    "known_command",
    "list_commands",
    "quit",
    "boardsize",
    "clear_board",
    "komi",
    "play",
    "genmove",
    "showboard",
    "perft",
    "mcts-show",
    "param",
];

/// The command interpreter bound to one session.
pub struct GtpRepl {
    session: EngineSession,
    name: String,
}

impl GtpRepl {
    pub fn new(session: EngineSession, name: String) -> Self {
        Self { session, name }
    }

    /// Read commands until `quit` or end of input, writing framed replies.
    pub fn run(&mut self, input: impl BufRead, mut output: impl Write) -> std::io::Result<()> {
        for line in input.lines() {
            let line = line?;
            let Some((id, command, args)) = preprocess(&line) else {
                continue;
            };
            debug!(command, ?args, "gtp command");

            let (result, quit) = self.dispatch(&command, &args);
            let id_str = id.map(|n| n.to_string()).unwrap_or_default();
            match result {
                Ok(body) => {
                    if body.is_empty() {
                        writeln!(output, "={id_str}\n")?;
                    } else {
                        writeln!(output, "={id_str} {body}\n")?;
                    }
                }
                Err(message) => writeln!(output, "?{id_str} {message}\n")?,
            }
            output.flush()?;
            if quit {
                break;
            }
        }
        Ok(())
    }

    /// Execute one command. Returns the reply body and whether to quit.
    fn dispatch(&mut self, command: &str, args: &[String]) -> (Result<String, String>, bool) {
        let result = match command {
            "protocol_version" => Ok("2".to_string()),
            "name" => Ok(self.name.clone()),
            "version" => Ok(env!("CARGO_PKG_VERSION").to_string()),
            "known_command" => match args.first() {
                Some(name) => Ok(COMMANDS.contains(&name.as_str()).to_string()),
                None => Err("syntax error".to_string()),
            },
            "list_commands" => Ok(COMMANDS.join("\n")),
            "quit" => return (Ok(String::new()), true),
            "boardsize" => self.cmd_boardsize(args),
            "clear_board" => {
                self.session.clear_board();
                Ok(String::new())
            }
            "komi" => self.cmd_komi(args),
            "play" => self.cmd_play(args),
            "genmove" => self.cmd_genmove(args),
            "showboard" => Ok(format!("\n{}", self.session.showboard())),
            "perft" => self.cmd_perft(args),
            "mcts-show" => self.cmd_show_tree(args),
            "param" => self.cmd_param(args),
            _ => Err("unknown command".to_string()),
        };
        (result, false)
    }

    fn cmd_boardsize(&mut self, args: &[String]) -> Result<String, String> {
        let size: usize = args
            .first()
            .and_then(|s| s.parse().ok())
            .ok_or("syntax error")?;
        self.session
            .boardsize(size)
            .map(|_| String::new())
            .map_err(stringify)
    }

    fn cmd_komi(&mut self, args: &[String]) -> Result<String, String> {
        let komi: f32 = args
            .first()
            .and_then(|s| s.parse().ok())
            .ok_or("syntax error")?;
        self.session.set_komi(komi);
        Ok(String::new())
    }

    fn cmd_play(&mut self, args: &[String]) -> Result<String, String> {
        let (color, vertex) = match args {
            [color, vertex] => (color, vertex),
            _ => return Err("syntax error".to_string()),
        };
        let player: Player = color.parse().map_err(|_| "syntax error")?;
        let vertex: Vertex = vertex.parse().map_err(|_| "syntax error")?;
        self.session
            .play(Move::new(player, vertex))
            .map(|_| String::new())
            .map_err(stringify)
    }

    fn cmd_genmove(&mut self, args: &[String]) -> Result<String, String> {
        let player: Player = args
            .first()
            .and_then(|s| s.parse().ok())
            .ok_or("syntax error")?;
        let vertex = self.session.genmove(player);
        Ok(vertex.to_string())
    }

    fn cmd_perft(&mut self, args: &[String]) -> Result<String, String> {
        let depth: usize = args
            .first()
            .and_then(|s| s.parse().ok())
            .ok_or("syntax error")?;
        Ok(self.session.perft(depth).to_string())
    }

    fn cmd_show_tree(&mut self, args: &[String]) -> Result<String, String> {
        let (default_min, default_max) = self.session.default_show_limits();
        let min_visits: f32 = match args.first() {
            Some(s) => s.parse().map_err(|_| "syntax error")?,
            None => default_min,
        };
        let max_children: usize = match args.get(1) {
            Some(s) => s.parse().map_err(|_| "syntax error")?,
            None => default_max,
        };
        Ok(format!("\n{}", self.session.show_tree(min_visits, max_children)))
    }

    fn cmd_param(&mut self, args: &[String]) -> Result<String, String> {
        match args {
            [] => Ok(self.session.list_params()),
            [name] => self.session.get_param(name).map_err(stringify),
            [name, value] => self
                .session
                .set_param(name, value)
                .map(|_| String::new())
                .map_err(stringify),
            _ => Err("syntax error".to_string()),
        }
    }
}

fn stringify(err: SessionError) -> String {
    err.to_string()
}

/// Strip comments, tokenize, and split off the optional numeric id.
/// Returns `None` for lines with no command.
fn preprocess(line: &str) -> Option<(Option<u32>, String, Vec<String>)> {
    let line = line.split('#').next().unwrap_or("");
    let mut tokens = line.split_whitespace().map(str::to_string);
    let first = tokens.next()?;

    let (id, command) = match first.parse::<u32>() {
        Ok(id) => (Some(id), tokens.next()?),
        Err(_) => (None, first),
    };
    Some((id, command.to_ascii_lowercase(), tokens.collect()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use engine_config::EngineConfig;
    use std::io::Cursor;

    fn quick_repl() -> GtpRepl {
        let mut config = EngineConfig::default();
        config.board.size = 5;
        config.search.playout_count = 20;
        config.search.mature_update_threshold = 2.0;
        config.search.max_nodes = 10_000;
        GtpRepl::new(EngineSession::new(&config, 42), "goban".to_string())
    }

    fn run_script(script: &str) -> String {
        let mut repl = quick_repl();
        let mut output = Vec::new();
        repl.run(Cursor::new(script.to_string()), &mut output).unwrap();
        String::from_utf8(output).unwrap()
    }

    #[test]
    fn test_preprocess_framing() {
        assert_eq!(
            preprocess("1 play b D4"),
            Some((
                Some(1),
                "play".to_string(),
                vec!["b".to_string(), "D4".to_string()]
            ))
        );
        assert_eq!(
            preprocess("genmove w"),
            Some((None, "genmove".to_string(), vec!["w".to_string()]))
        );
        assert_eq!(preprocess("   # just a comment"), None);
        assert_eq!(preprocess(""), None);
    }

    #[test]
    fn test_administrative_commands() {
        let out = run_script("1 protocol_version\n2 name\nknown_command genmove\nknown_command bogus\n");
        assert!(out.contains("=1 2\n\n"));
        assert!(out.contains("=2 goban\n\n"));
        assert!(out.contains("= true\n\n"));
        assert!(out.contains("= false\n\n"));
    }

    #[test]
    fn test_unknown_command_is_an_error_reply() {
        let out = run_script("7 frobnicate\n");
        assert!(out.starts_with("?7 unknown command\n"));
    }

    #[test]
    fn test_play_and_illegal_play() {
        let out = run_script("play b c3\nplay w c3\n");
        let replies: Vec<&str> = out.split("\n\n").collect();
        assert_eq!(replies[0], "=");
        assert_eq!(replies[1], "? illegal move");
    }

    #[test]
    fn test_malformed_play_is_syntax_error() {
        let out = run_script("play purple c3\nplay b\n");
        assert!(out.contains("? syntax error"));
        let errors = out.matches('?').count();
        assert_eq!(errors, 2);
    }

    #[test]
    fn test_genmove_replies_with_a_vertex() {
        let out = run_script("genmove b\n");
        let reply = out.trim();
        assert!(reply.starts_with("= "));
        let vertex = reply.trim_start_matches("= ").to_string();
        assert!(vertex.parse::<Vertex>().is_ok());
    }

    #[test]
    fn test_quit_stops_processing() {
        let out = run_script("quit\nname\n");
        assert_eq!(out, "=\n\n");
    }

    #[test]
    fn test_boardsize_and_perft() {
        let out = run_script("boardsize 2\nperft 1\nboardsize 99\n");
        assert!(out.contains("= 5\n\n"));
        assert!(out.contains("? unacceptable size"));
    }

    #[test]
    fn test_param_listing_and_update() {
        let out = run_script("param\nparam explore_rate\nparam explore_rate 2.0\nparam explore_rate\n");
        for name in PARAM_NAMES {
            assert!(out.contains(name));
        }
        assert!(out.contains("= 2\n\n"));
    }

    #[test]
    fn test_mcts_show_renders_tree() {
        let out = run_script("genmove b\nmcts-show 0 3\n");
        // The dump starts on its own line under the reply marker
        assert!(out.contains("=\n") || out.contains("= \n"));
        assert!(out.contains("->"));
    }
}
