use color_eyre::{eyre::Context, Result};
use env_logger::{Builder, Target};
use log::{Level, LevelFilter};

/// [`config_logger`] The configuration for `env_logger`
pub fn config_logger(verbose_level: u8, target: Target) -> Result<()> {
    let mut builder = Builder::from_default_env();

    builder
        .target(target)
        .format_indent(Some(4))
        .format_module_path(false)
        .format_timestamp_millis();

    builder.filter(
        None,
        match verbose_level {
            0 => LevelFilter::Info,
            1 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        },
    );

    builder
        .try_init()
        .with_context(|| "sln2cmake wasn't able to set up the logger")
}

/// Where the conversion stages report what the user must know about: progress, the
/// non-fatal findings (warnings) and the reasons of a failure.
///
/// Stages receive the sink explicitly instead of reaching for a global logger, so each one
/// of them can be exercised in isolation with a [`CapturingSink`]
pub trait LogSink {
    fn record(&mut self, level: Level, message: &str);

    fn info(&mut self, message: &str) {
        self.record(Level::Info, message)
    }

    fn warn(&mut self, message: &str) {
        self.record(Level::Warn, message)
    }

    fn error(&mut self, message: &str) {
        self.record(Level::Error, message)
    }
}

/// Forwards every record to the `log` facade
#[derive(Debug, Default, Clone, Copy)]
pub struct LogFacadeSink;

impl LogSink for LogFacadeSink {
    fn record(&mut self, level: Level, message: &str) {
        log::log!(level, "{message}");
    }
}

/// Keeps every record in memory
#[derive(Debug, Default, Clone)]
pub struct CapturingSink {
    pub records: Vec<(Level, String)>,
}

impl CapturingSink {
    pub fn messages(&self, level: Level) -> Vec<&str> {
        self.records
            .iter()
            .filter(|(lvl, _)| *lvl == level)
            .map(|(_, msg)| msg.as_str())
            .collect()
    }

    pub fn warnings(&self) -> Vec<&str> {
        self.messages(Level::Warn)
    }
}

impl LogSink for CapturingSink {
    fn record(&mut self, level: Level, message: &str) {
        self.records.push((level, message.to_string()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capturing_sink_filters_by_level() {
        let mut sink = CapturingSink::default();
        sink.info("converting");
        sink.warn("env var 'BOOST_ROOT' found");
        sink.error("boom");

        assert_eq!(sink.warnings(), vec!["env var 'BOOST_ROOT' found"]);
        assert_eq!(sink.messages(Level::Error), vec!["boom"]);
        assert_eq!(sink.records.len(), 3);
    }
}
