use cinesearch_core::MovieId;

pub const HELP: &str = "\
type to search (each line replaces the query)
  :open <id>   show a movie by id
  :pick <n>    open the n-th result or recommendation
  :back        return to the result list
  :help        show this help
  :quit        exit";

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Input(String),
    Open(MovieId),
    Pick(usize),
    Back,
    Help,
    Quit,
    Unknown(String),
}

pub fn parse(line: &str) -> Command {
    let line = line.trim_end_matches(['\r', '\n']);
    let Some(rest) = line.strip_prefix(':') else {
        return Command::Input(line.to_string());
    };

    let mut parts = rest.split_whitespace();
    let verb = parts.next().unwrap_or_default();
    let arg = parts.next();
    match (verb, arg) {
        ("open", Some(id)) => Command::Open(MovieId::from(id)),
        ("pick", Some(n)) => match n.parse::<usize>() {
            Ok(n) if n > 0 => Command::Pick(n),
            _ => Command::Unknown(line.to_string()),
        },
        ("back", None) => Command::Back,
        ("help", None) => Command::Help,
        ("quit" | "q", None) => Command::Quit,
        _ => Command::Unknown(line.to_string()),
    }
}
