//! Interactive line protocol over a live binding.
//!
//! A plain line replaces the query text. Lines starting with `:` are
//! commands:
//!
//! | Command                          | Effect                               |
//! |----------------------------------|--------------------------------------|
//! | `:add FIRST LAST [PATRONYMIC]`   | append a record to the source        |
//! | `:rm N`                          | remove the N-th source record        |
//! | `:sort FIELD [asc\|desc] ...`    | sort by one or more columns          |
//! | `:unsort`                        | restore source order                 |
//! | `:clear`                         | clear the query                      |
//! | `:stats`                         | print pipeline counters              |
//! | `:help`                          | list commands                        |
//! | `:quit`                          | end the session                      |
//!
//! A line starting with `::` searches for the text after the first colon.

use std::io::{BufRead, Write};
use std::path::PathBuf;
use std::rc::Rc;
use std::str::FromStr;

use roster_seeker::{Binding, Dir, ObservableList, OrderBy, PipelineStats, Property};
use tracing::{debug, warn};

use crate::config::Config;
use crate::error::{Result, RosterError};
use crate::person::Person;
use crate::table::{OutputFormat, TableSurface};

const HELP: &str = "\
type text to search; commands:
  :add FIRST LAST [PATRONYMIC]   add a record
  :rm N                          remove the N-th source record
  :sort FIELD [asc|desc] ...     sort by columns
  :unsort                        restore source order
  :clear                         clear the search
  :stats                         show counters
  :quit                          leave";

/// One parsed session line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Query(String),
    Add(Person),
    /// 1-based position in the source collection.
    Remove(usize),
    Sort(Vec<OrderBy>),
    Unsort,
    Clear,
    Stats,
    Help,
    Quit,
}

impl Command {
    /// Parses a line with its line terminator already removed.
    pub fn parse(line: &str) -> Result<Command> {
        let Some(rest) = line.strip_prefix(':') else {
            return Ok(Command::Query(line.to_string()));
        };
        if rest.starts_with(':') {
            return Ok(Command::Query(rest.to_string()));
        }

        let mut words = rest.split_whitespace();
        let name = words.next().unwrap_or_default();
        let args: Vec<&str> = words.collect();

        match name {
            "add" => match args.as_slice() {
                [first, last] => Ok(Command::Add(Person::new(*first, *last, ""))),
                [first, last, patronymic] => {
                    Ok(Command::Add(Person::new(*first, *last, *patronymic)))
                }
                _ => Err(usage("add FIRST LAST [PATRONYMIC]")),
            },
            "rm" => match args.as_slice() {
                [n] => n
                    .parse::<usize>()
                    .ok()
                    .filter(|n| *n > 0)
                    .map(Command::Remove)
                    .ok_or_else(|| {
                        RosterError::Command(format!("'{}' is not a row number", n))
                    }),
                _ => Err(usage("rm N")),
            },
            "sort" if args.is_empty() => Err(usage("sort FIELD [asc|desc] ...")),
            "sort" => parse_sort(&args).map(Command::Sort),
            "unsort" => Ok(Command::Unsort),
            "clear" => Ok(Command::Clear),
            "stats" => Ok(Command::Stats),
            "help" | "h" | "?" => Ok(Command::Help),
            "quit" | "q" | "exit" => Ok(Command::Quit),
            "" => Err(RosterError::Command("empty command".into())),
            other => Err(RosterError::Command(format!(
                "unknown command ':{}' (try :help)",
                other
            ))),
        }
    }
}

fn usage(form: &str) -> RosterError {
    RosterError::Command(format!("usage: :{}", form))
}

/// Accepts `field`, `field:dir`, and `field dir` tokens.
fn parse_sort(args: &[&str]) -> Result<Vec<OrderBy>> {
    let mut columns: Vec<OrderBy> = Vec::new();
    for arg in args {
        if let (Some(last), Ok(dir)) = (columns.last_mut(), Dir::from_str(arg)) {
            last.dir = dir;
            continue;
        }
        columns.push(OrderBy::from_str(arg)?);
    }
    Ok(columns)
}

/// What the caller should do after a command ran.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The visible rows may have changed.
    Render,
    Stats(PipelineStats),
    Help,
    Quit,
}

/// A live roster: source records, query text, and the table bound to them.
#[derive(Debug)]
pub struct Session {
    source: ObservableList<Person>,
    query: Property<String>,
    table: Rc<TableSurface>,
    binding: Binding<Person, TableSurface>,
    format: OutputFormat,
    prompt: Option<String>,
}

impl Session {
    /// Binds `records` to a fresh table using the configured strategies and
    /// initial sort.
    pub fn new(records: Vec<Person>, config: &Config) -> Result<Session> {
        let strategies = config.strategies()?;
        let table = Rc::new(TableSurface::new());
        table.sort_by(&config.sort)?;

        let source = ObservableList::from(records);
        let query = Property::new(String::new());
        let binding = Binding::bind(&source, &query, Rc::clone(&table), strategies)?;

        Ok(Session {
            source,
            query,
            table,
            binding,
            format: OutputFormat::Table,
            prompt: None,
        })
    }

    pub fn with_format(mut self, format: OutputFormat) -> Self {
        self.format = format;
        self
    }

    /// Writes `prompt` before reading each line.
    pub fn with_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.prompt = Some(prompt.into());
        self
    }

    pub fn source(&self) -> &ObservableList<Person> {
        &self.source
    }

    pub fn query(&self) -> &Property<String> {
        &self.query
    }

    pub fn table(&self) -> &TableSurface {
        &self.table
    }

    pub fn stats(&self) -> PipelineStats {
        self.binding.stats()
    }

    /// Applies one command to the pipeline.
    pub fn execute(&self, command: Command) -> Result<Outcome> {
        debug!(?command, "executing");
        match command {
            Command::Query(text) => self.query.set(text)?,
            Command::Add(person) => self.source.push(person)?,
            Command::Remove(n) => {
                let index = n.checked_sub(1).ok_or_else(|| {
                    RosterError::Command(format!("'{}' is not a row number", n))
                })?;
                self.source.remove(index)?;
            }
            Command::Sort(columns) => self.table.sort_by(&columns)?,
            Command::Unsort => self.table.clear_sort()?,
            Command::Clear => self.query.set(String::new())?,
            Command::Stats => return Ok(Outcome::Stats(self.binding.stats())),
            Command::Help => return Ok(Outcome::Help),
            Command::Quit => return Ok(Outcome::Quit),
        }
        Ok(Outcome::Render)
    }

    /// Writes the visible rows in the session's output format.
    pub fn render<W: Write>(&self, out: &mut W) -> Result<()> {
        self.table.write(out, self.format)?;
        Ok(())
    }

    /// Reads lines until end of input or `:quit`.
    ///
    /// Mistakes such as an unknown command or a bad row number are reported
    /// on `out` and the session continues. Other errors end it.
    pub fn run<R: BufRead, W: Write>(&self, mut input: R, out: &mut W) -> Result<()> {
        self.render(out)?;
        let mut line = String::new();
        loop {
            if let Some(prompt) = &self.prompt {
                write!(out, "{}", prompt)?;
                out.flush()?;
            }
            line.clear();
            let read = input
                .read_line(&mut line)
                .map_err(|source| RosterError::Io {
                    path: PathBuf::from("<stdin>"),
                    source,
                })?;
            if read == 0 {
                break;
            }
            let text = line.trim_end_matches(['\n', '\r']);

            match Command::parse(text).and_then(|command| self.execute(command)) {
                Ok(Outcome::Render) => self.render(out)?,
                Ok(Outcome::Stats(stats)) => writeln!(
                    out,
                    "records: {}  matched: {}  passes: {}",
                    stats.source_len, stats.filtered_len, stats.passes
                )?,
                Ok(Outcome::Help) => writeln!(out, "{}", HELP)?,
                Ok(Outcome::Quit) => break,
                Err(err) if err.is_recoverable() => {
                    warn!(%err, line = text, "rejected session line");
                    writeln!(out, "error: {}", err)?;
                }
                Err(err) => return Err(err),
            }
        }
        Ok(())
    }

    /// Detaches the table from the source and query.
    pub fn close(self) {
        self.binding.unbind();
    }
}
