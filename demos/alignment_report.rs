use feedback_alignment::example_apps::run_alignment_report;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    run_alignment_report(std::env::args().skip(1))
}
