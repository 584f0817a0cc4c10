fn main() -> Result<(), Box<dyn std::error::Error>> {
    cadence::runtime::run()
}
