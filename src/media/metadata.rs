use crate::tools::{Tool, ffprobe_duration_args};
use std::error::Error;
use std::fs::File;
use std::path::Path;
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;
use symphonia::default::get_probe;

/// Length of an audio file in seconds.
///
/// WAV and FLAC headers are read with `hound` and `claxon`, MP3/AAC/M4A
/// streams with `symphonia`. `ffprobe` is only run for what those cannot
/// read, so a missing `ffprobe` surfaces as [`crate::tools::MissingTool`].
pub fn probe_duration(path: &Path, ffprobe: &Tool) -> Result<f64, Box<dyn Error>> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase());

    match extension.as_deref() {
        Some("wav") => wav_duration(path),
        Some("flac") => flac_duration(path),
        _ => match stream_duration(path) {
            Ok(seconds) => Ok(seconds),
            Err(e) => {
                log::debug!("symphonia could not measure {}: {e}", path.display());
                ffprobe_duration(path, ffprobe)
            }
        },
    }
}

fn wav_duration(path: &Path) -> Result<f64, Box<dyn Error>> {
    let reader = hound::WavReader::open(path)?;
    let sample_rate = reader.spec().sample_rate;
    if sample_rate == 0 {
        return Err("WAV header reports a zero sample rate".into());
    }
    // duration() counts frames, i.e. samples per channel
    Ok(reader.duration() as f64 / sample_rate as f64)
}

fn flac_duration(path: &Path) -> Result<f64, Box<dyn Error>> {
    let reader = claxon::FlacReader::open(path)?;
    let info = reader.streaminfo();

    match info.samples {
        Some(samples) if info.sample_rate > 0 => Ok(samples as f64 / info.sample_rate as f64),
        _ => Err("FLAC stream info has no sample count".into()),
    }
}

/// Duration from the default track of a container, counting packets when the
/// header carries no frame count.
fn stream_duration(path: &Path) -> Result<f64, Box<dyn Error>> {
    let mut hint = Hint::new();
    if let Some(extension) = path.extension().and_then(|ext| ext.to_str()) {
        hint.with_extension(extension);
    }

    let file = File::open(path)?;
    let mss = MediaSourceStream::new(Box::new(file), Default::default());
    let probed = get_probe().format(
        &hint,
        mss,
        &FormatOptions::default(),
        &MetadataOptions::default(),
    )?;
    let mut reader = probed.format;

    let track = reader.default_track().ok_or("No default audio track")?;
    let track_id = track.id;
    let params = track.codec_params.clone();

    if let (Some(frames), Some(rate)) = (params.n_frames, params.sample_rate)
        && rate > 0
    {
        return Ok(frames as f64 / rate as f64);
    }

    let time_base = params.time_base.ok_or("Stream has no time base")?;
    let mut ticks: u64 = 0;
    while let Ok(packet) = reader.next_packet() {
        if packet.track_id() == track_id {
            ticks += packet.dur;
        }
    }
    if ticks == 0 {
        return Err("Stream has no audio packets".into());
    }

    let time = time_base.calc_time(ticks);
    Ok(time.seconds as f64 + time.frac)
}

fn ffprobe_duration(path: &Path, ffprobe: &Tool) -> Result<f64, Box<dyn Error>> {
    let stdout = ffprobe.run(&ffprobe_duration_args(path))?;
    let trimmed = stdout.trim();
    trimmed
        .parse::<f64>()
        .map_err(|_| format!("Unexpected ffprobe duration '{trimmed}'").into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write_wav(path: &Path, sample_rate: u32, channels: u16, frames: u32) {
        let spec = hound::WavSpec {
            channels,
            sample_rate,
            bits_per_sample: 16,
            sample_format: hound::SampleFormat::Int,
        };
        let mut writer = hound::WavWriter::create(path, spec).unwrap();
        for _ in 0..frames * channels as u32 {
            writer.write_sample(0i16).unwrap();
        }
        writer.finalize().unwrap();
    }

    #[test]
    fn test_wav_duration_mono() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("tone.wav");
        write_wav(&path, 8000, 1, 16000);

        let duration = probe_duration(&path, &Tool::new("ffprobe")).unwrap();
        assert!((duration - 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_wav_duration_stereo_counts_frames() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("Stereo.WAV");
        write_wav(&path, 4000, 2, 6000);

        let duration = probe_duration(&path, &Tool::new("ffprobe")).unwrap();
        assert!((duration - 1.5).abs() < 1e-9);
    }

    #[test]
    fn test_invalid_wav() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("broken.wav");
        std::fs::write(&path, b"not a wav").unwrap();

        assert!(probe_duration(&path, &Tool::new("ffprobe")).is_err());
    }

    #[test]
    fn test_stream_duration_reads_wav_container() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("tone.wav");
        write_wav(&path, 8000, 1, 20000);

        let duration = stream_duration(&path).unwrap();
        assert!((duration - 2.5).abs() < 1e-6);
    }

    #[test]
    fn test_stream_duration_rejects_garbage() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("song.mp3");
        std::fs::write(&path, b"fake").unwrap();

        assert!(stream_duration(&path).is_err());
    }

    #[test]
    fn test_unreadable_mp3_falls_back_to_missing_ffprobe() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("song.mp3");
        std::fs::write(&path, b"fake").unwrap();

        let ffprobe = Tool::new("definitely-not-ffprobe-12345");
        let err = probe_duration(&path, &ffprobe).unwrap_err();
        assert!(crate::tools::is_missing_tool(&*err));
    }

    #[test]
    fn test_missing_ffprobe_is_an_error() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("song.mp3");
        std::fs::write(&path, b"fake").unwrap();

        let ffprobe = Tool::new("definitely-not-ffprobe-12345");
        assert!(probe_duration(&path, &ffprobe).is_err());
    }
}
