//! # Roster - search, filter, and sort people in the terminal
//!
//! `roster` loads a list of people from a JSON or YAML file and keeps a table
//! of them live: the table always shows the records that match the current
//! query, in the order of the current sort columns. Adding or removing a
//! record, typing a new query, or picking a sort column each re-runs the
//! filter-then-sort pipeline from [`roster_seeker`].
//!
//! ```rust
//! use roster::{Command, Config, Person, Session};
//!
//! let people = vec![
//!     Person::new("Anna", "Smith", "Ivanovna"),
//!     Person::new("Ben", "Anders", ""),
//! ];
//! let session = Session::new(people, &Config::default()).unwrap();
//!
//! session.execute(Command::Query("iva".into())).unwrap();
//! assert_eq!(session.table().rows(), [Person::new("Anna", "Smith", "Ivanovna")]);
//! ```
//!
//! ## Modules
//!
//! - [`person`]: the record type and its name strategies
//! - [`load`]: reading records from disk
//! - [`config`]: YAML configuration for search fields and default sort
//! - [`table`]: the table display surface
//! - [`session`]: the interactive line protocol

pub mod config;
pub mod error;
pub mod load;
pub mod person;
pub mod session;
pub mod table;

pub use config::{Config, SearchConfig};
pub use error::{Result, RosterError};
pub use load::{load_records, parse_records, Format};
pub use person::{NameMatch, Person};
pub use session::{Command, Outcome, Session};
pub use table::{OutputFormat, TableSurface};
