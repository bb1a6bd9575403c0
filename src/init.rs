use env_logger::Env;

/// 初始化日誌系統
///
/// 預設層級為 `info`，可用 `RUST_LOG` 覆寫（例如 `RUST_LOG=debug`）。
pub fn init() {
    let _ = env_logger::Builder::from_env(Env::default().default_filter_or("info"))
        .format_target(false)
        .try_init();
}
