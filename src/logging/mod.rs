use log::LevelFilter;

/// Route the `log` facade to the browser console.
///
/// Safe to call more than once: later calls only adjust the level.
pub fn init(level: LevelFilter) {
    let Some(max) = level.to_level() else {
        log::set_max_level(LevelFilter::Off);
        return;
    };

    match console_log::init_with_level(max) {
        Ok(()) => log::info!("logger initialized at {level}"),
        Err(e) => {
            log::set_max_level(level);
            log::debug!("console logger already installed: {e}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_off_installs_nothing() {
        init(LevelFilter::Off);
        assert_eq!(log::max_level(), LevelFilter::Off);
    }
}
