//! Default TOML config template with inline documentation comments.

/// Generate the default TOML config content with comments.
pub(crate) fn default_config_toml() -> String {
    r##"# tether configuration
# Schema version 1
# Only override what you want to change -- missing fields use defaults.

[hub]
# url = "ws://127.0.0.1:7878"   # where window processes connect
# port = 7878                   # tether-hub listen port
# connect_timeout = 5           # 1-60 seconds

[channel]
# capacity = 256                # 1-65536 buffered messages per subscriber

[mirror]
# path = "/path/to/window-mirror.json"

[satellite]
# launch = true                 # spawn a satellite process on pop-out

[logging]
# level = "info"                # trace, debug, info, warn, error
"##
    .to_string()
}
