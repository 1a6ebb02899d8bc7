use pin_network::boundary::Polygon;
use pin_network::types::GeoPoint;
use pin_network::{FieldSetup, PinLocator, PinParams};

fn main() {
    // Demo stub: grows a purely geometric lattice over a 10 × 6 rectangle
    let field = FieldSetup::new(
        Polygon::rectangle(0.0, 0.0, 10.0, 6.0),
        GeoPoint::new(1.0, 1.0),
        GeoPoint::new(9.0, 1.0),
    );
    let params = PinParams {
        row_spacing: 1.0,
        col_spacing: 1.0,
        ..Default::default()
    };
    match PinLocator::new(params, field).run() {
        Ok(run) => println!("{}", run.report.summary()),
        Err(err) => {
            eprintln!("Error: {err}");
            std::process::exit(1);
        }
    }
}
