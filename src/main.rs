#[tokio::main]
async fn main() -> anyhow::Result<()> {
    if let Err(e) = attendance_tracker::run().await {
        eprintln!("attendance-tracker fatal: {e:#}");
        std::process::exit(1);
    }
    Ok(())
}
