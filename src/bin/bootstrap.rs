#[tokio::main]
async fn main() -> anyhow::Result<()> {
    if let Err(e) = attendance_tracker::run_bootstrap().await {
        eprintln!("attendance-bootstrap fatal: {e:#}");
        std::process::exit(1);
    }
    Ok(())
}
