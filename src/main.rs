use cardiopulse::{generate_cohort, write_cohort_csv, GeneratorConfig};

fn main() -> Result<(), anyhow::Error> {
    env_logger::init();

    let config = GeneratorConfig::default();
    let cohort = generate_cohort(&config)?;
    write_cohort_csv(&config.output_path, &cohort)?;

    println!(
        "Synthetic CardioPulse dataset generated: {}",
        config.output_path.display()
    );
    println!("Readmission rate: {:.3}", cohort.readmission_rate());

    Ok(())
}
