//! Adapters: concrete implementations of the hexagonal port traits.
//!
//! | Adapter       | Implements                | Connects to               |
//! |---------------|---------------------------|---------------------------|
//! | `clock`       | Clock                     | host wall clock           |
//! | `config_file` | ConfigPort                | JSON config file          |
//! | `contacts`    | ContactStore              | JSON contact list         |
//! | `dry_run`     | VoiceChannel, SmsChannel  | log output (no provider)  |
//! | `indicator`   | AlertIndicator            | log output                |
//! | `location`    | Geolocator                | configured fixed position |
//! | `log_sink`    | EventSink                 | log output                |

pub mod clock;
pub mod config_file;
pub mod contacts;
pub mod dry_run;
pub mod indicator;
pub mod location;
pub mod log_sink;
