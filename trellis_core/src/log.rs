//! Logging helpers routed through the `log` facade, so the embedding host
//! decides where warnings end up.

pub fn console_warn(msg: &str) {
    log::warn!(target: "trellis", "{}", msg);
}

pub fn console_error(msg: &str) {
    log::error!(target: "trellis", "{}", msg);
}
