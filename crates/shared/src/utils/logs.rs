use opentelemetry_appender_tracing::layer::OpenTelemetryTracingBridge;
use opentelemetry_sdk::logs::SdkLoggerProvider;
use tracing_subscriber::{EnvFilter, Layer, fmt, prelude::*};

pub fn init_logger(
    sdk_logger_provider: SdkLoggerProvider,
    component: &str,
    is_dev: bool,
    is_enable_file: bool,
) {
    let file_layer = if is_enable_file {
        let log_dir = if is_dev { "./logs" } else { "/var/log/app" };

        let file_name = format!("registration_{component}.log");
        let file_appender = tracing_appender::rolling::daily(log_dir, file_name);
        let (file_writer, guard) = tracing_appender::non_blocking(file_appender);

        // The writer flushes on drop; keep it alive for the whole process.
        std::mem::forget(guard);

        Some(
            fmt::layer()
                .with_writer(file_writer)
                .with_ansi(false)
                .json()
                .with_filter(EnvFilter::new("info")),
        )
    } else {
        None
    };

    let default_console = if is_dev { "debug" } else { "info" };
    let console_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_console));

    let console_layer = if is_dev {
        fmt::layer()
            .pretty()
            .with_thread_names(true)
            .with_ansi(true)
            .with_filter(console_filter)
            .boxed()
    } else {
        fmt::layer()
            .compact()
            .with_ansi(false)
            .with_filter(console_filter)
            .boxed()
    };

    let otel_filter = EnvFilter::new("info")
        .add_directive("hyper=off".parse().expect("static directive"))
        .add_directive("opentelemetry=off".parse().expect("static directive"))
        .add_directive("tonic=off".parse().expect("static directive"))
        .add_directive("h2=off".parse().expect("static directive"))
        .add_directive("reqwest=off".parse().expect("static directive"))
        .add_directive("sqlx=warn".parse().expect("static directive"));

    let otel_layer = OpenTelemetryTracingBridge::new(&sdk_logger_provider).with_filter(otel_filter);

    tracing_subscriber::registry()
        .with(file_layer)
        .with(console_layer)
        .with(otel_layer)
        .init();
}
