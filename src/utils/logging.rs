use log::LevelFilter;
use log4rs::{
    Config,
    append::{console::ConsoleAppender, file::FileAppender},
    config::{Appender, Logger, Root},
    encode::pattern::PatternEncoder,
    init_config,
};

/// The pattern to use when logging
const LOGGING_PATTERN: &str = "[{d} {h({l})} {M}] {m}{n}";

/// Log file name
pub const LOG_FILE_NAME: &str = "data/site-i18n.log";

/// Name of the logger for this crate's modules
const CRATE_LOGGER: &str = "site_i18n";

/// Setup function for setting up the Log4rs logging configuring it
/// for the crate modules and setting up file and stdout logging
pub fn setup(logging_level: LevelFilter) {
    if logging_level == LevelFilter::Off {
        // Don't initialize logger at all if logging is disabled
        return;
    }

    // Create logging appenders
    let pattern = Box::new(PatternEncoder::new(LOGGING_PATTERN));
    let console = Box::new(ConsoleAppender::builder().encoder(pattern.clone()).build());
    let file = Box::new(
        FileAppender::builder()
            .encoder(pattern)
            .build(LOG_FILE_NAME)
            .expect("Unable to create logging file appender"),
    );

    const APPENDERS: [&str; 2] = ["stdout", "file"];

    let config = Config::builder()
        .appender(Appender::builder().build("stdout", console))
        .appender(Appender::builder().build("file", file))
        .logger(
            Logger::builder()
                .appenders(APPENDERS)
                .additive(false)
                .build(CRATE_LOGGER, logging_level),
        )
        .build(Root::builder().appenders(APPENDERS).build(LevelFilter::Warn))
        .expect("Failed to create logging config");

    init_config(config).expect("Unable to initialize logger");

    // Panics are written to the log rather than only stderr
    log_panics::init();
}

/// Console only logging for tests, safe to call from every test
#[cfg(test)]
pub fn setup_test_logging() {
    use std::sync::Once;

    static INIT: Once = Once::new();

    INIT.call_once(|| {
        let pattern = Box::new(PatternEncoder::new(LOGGING_PATTERN));
        let console = Box::new(ConsoleAppender::builder().encoder(pattern).build());

        let config = Config::builder()
            .appender(Appender::builder().build("stdout", console))
            .build(Root::builder().appender("stdout").build(LevelFilter::Debug))
            .expect("Failed to create test logging config");

        // Another test harness may have installed a logger already
        _ = init_config(config);
    });
}
