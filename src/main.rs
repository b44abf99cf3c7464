use dicom3d_uploader::app::UploaderApp;
use eframe::CreationContext;

fn main() -> Result<(), eframe::Error> {
    env_logger::init();

    let options = eframe::NativeOptions {
        viewport: eframe::egui::ViewportBuilder::default()
            .with_inner_size([640.0, 720.0])
            .with_min_inner_size([460.0, 560.0]),
        ..Default::default()
    };

    eframe::run_native(
        "DICOM 3D-Modell Generator",
        options,
        Box::new(|cc: &CreationContext| Box::new(UploaderApp::new(cc))),
    )
}
