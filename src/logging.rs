//! Browser console logging through the `log` facade.

use log::Level;

/// Route `log` records to the browser console. Later calls only adjust the
/// level; the logger itself can be installed once per page.
pub fn init(level: Level) {
    if console_log::init_with_level(level).is_err() {
        log::trace!("console logger already installed");
    }
    log::set_max_level(level.to_level_filter());
}
