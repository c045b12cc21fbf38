fn main() -> anyhow::Result<()> {
    detection_monitor_lib::run()
}
