use gondola_core::error::GondolaError;

pub fn print<T: serde::Serialize>(value: &T) -> Result<(), GondolaError> {
    let json = serde_json::to_string_pretty(value)?;
    println!("{json}");
    Ok(())
}
