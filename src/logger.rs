use chrono::Local;
use env_logger::{Builder, Env};
use std::io::Write;

/// Installs the process-wide logger. `RUST_LOG` overrides the default
/// `info` filter. Calling it more than once is harmless.
pub fn init() {
    let initialized = Builder::from_env(Env::default().default_filter_or("info"))
        .format(|buf, record| {
            writeln!(
                buf,
                "{} [{}] - {}",
                Local::now().format("%Y-%m-%d %H:%M:%S"),
                record.level(),
                record.args()
            )
        })
        .try_init()
        .is_ok();

    if initialized {
        log::info!("Logger initialized.");
    }
}
