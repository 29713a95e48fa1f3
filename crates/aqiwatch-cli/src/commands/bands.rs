use aqiwatch_core::BANDS;

pub fn run() {
    println!("AQI categories:\n");
    println!("  {:<9} {:<32} {:<8} {}", "Range", "Band", "Color", "Advisory");
    println!("  {}", "-".repeat(100));
    for band in &BANDS {
        println!(
            "  {:<9} {} {} {:<27} {:<8} {}",
            band.band.range_label(),
            band.marker,
            band.emoji,
            band.label,
            band.color.as_str(),
            band.advisory
        );
    }
    println!();
    println!("All readings shown by aqiwatch are simulated for demonstration purposes only.");
}
