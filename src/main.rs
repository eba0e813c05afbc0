use anyhow::Result;
use console::{Term, style};
use log::{info, warn};
use scene_cutter::config::Config;
use scene_cutter::init;
use scene_cutter::menu::show_main_menu;
use scene_cutter::tools::probe;

fn main() -> Result<()> {
    init::init();
    let term = Term::stdout();

    let mut config = Config::new()?;
    // 編碼器只在啟動時偵測一次
    let codec = probe();

    loop {
        match show_main_menu(&term, &mut config, codec) {
            Ok(true) => {}
            Ok(false) => {
                term.clear_screen()?;
                println!("\n{}", style("再見！").green().bold());
                info!("Program exited normally");
                break;
            }
            Err(e) => {
                warn!("Program error: {e}");
                eprintln!("{} {}", style("錯誤:").red().bold(), e);
                break;
            }
        }
    }

    Ok(())
}
