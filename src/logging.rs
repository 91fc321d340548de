use log::LevelFilter;

/// Logging settings chosen on the command line. `RUST_LOG`, when set, takes
/// precedence over the defaults derived from here.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct LogConfig {
    pub debug: bool,
}

impl LogConfig {
    /// Level for this crate's own records. Other crates stay at `warn`.
    pub fn level(&self) -> LevelFilter {
        if self.debug {
            LevelFilter::Debug
        } else {
            LevelFilter::Info
        }
    }

    fn default_filter(&self) -> String {
        format!(
            "warn,{}={}",
            env!("CARGO_CRATE_NAME"),
            self.level().to_string().to_lowercase()
        )
    }

    pub fn builder(&self) -> env_logger::Builder {
        let mut builder = env_logger::Builder::from_env(
            env_logger::Env::default().default_filter_or(self.default_filter()),
        );
        if !self.debug {
            builder
                .format_timestamp(None)
                .format_target(false)
                .format_level(false);
        }
        builder
    }

    /// Install the logger. Fails when another logger is already installed,
    /// in which case these settings have no effect.
    pub fn init(&self) -> Result<(), log::SetLoggerError> {
        self.builder().try_init()
    }
}
