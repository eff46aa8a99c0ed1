use geotiff_preview::image_pipeline::{ConversionConfig, RasterToImagePipeline};
use geotiff_preview::logger;

use tracing::{error, info};

fn main() -> anyhow::Result<()> {
    logger::init();

    let mut args = std::env::args().skip(1);
    let (Some(input), Some(output)) = (args.next(), args.next()) else {
        anyhow::bail!("usage: geotiff_preview <input.tif> <output.jpg|png|tif>");
    };

    let pipeline = RasterToImagePipeline::new(ConversionConfig::default());

    info!("Raster to image pipeline initialized");
    info!("Band selection: {:?}", pipeline.config().band_selection);
    info!("Normalization: {:?}", pipeline.config().normalization);

    match pipeline.convert_file(&input, &output) {
        Ok(report) => info!(
            "Conversion successful: {}x{} {} from {} band(s) of {}",
            report.width, report.height, report.format, report.source_bands, report.sample_type
        ),
        Err(e) => {
            error!("Conversion failed: {}", e);
            return Err(e.into());
        }
    }

    Ok(())
}
