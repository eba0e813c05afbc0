use crate::component::SceneCutter;
use crate::config::Config;
use crate::pause;
use crate::tools::VideoCodec;
use anyhow::Result;
use console::{Term, style};

pub fn run_manual_cut(term: &Term, config: &mut Config, codec: VideoCodec) -> Result<()> {
    run_cutter(term, config, codec, false)
}

pub fn run_scene_cut(term: &Term, config: &mut Config, codec: VideoCodec) -> Result<()> {
    run_cutter(term, config, codec, true)
}

fn run_cutter(
    term: &Term,
    config: &mut Config,
    codec: VideoCodec,
    use_scene_detection: bool,
) -> Result<()> {
    let mut cutter = SceneCutter::new(config, codec);

    if let Err(e) = cutter.run(use_scene_detection) {
        eprintln!("{} {}", style("錯誤:").red().bold(), e);
    }

    pause(term)?;
    Ok(())
}
