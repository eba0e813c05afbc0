use crate::config::Config;
use crate::config::save::save_settings;
use crate::menu::handlers::{run_manual_cut, run_scene_cut};
use crate::tools::VideoCodec;
use anyhow::Result;
use console::{Term, style};
use dialoguer::Select;
use dialoguer::theme::ColorfulTheme;

/// 可選的輸出容器
const OUTPUT_EXTENSIONS: [&str; 3] = ["mp4", "mkv", "mov"];

pub fn show_main_menu(term: &Term, config: &mut Config, codec: VideoCodec) -> Result<bool> {
    term.clear_screen()?;

    println!("{}", style("=== 影片切割與場景偵測 ===").cyan().bold());
    println!("{}", style("按 ESC 離開").dim());

    let options = vec![
        "依時間範圍切割",
        "場景偵測自動切割",
        "設定",
        "離開",
    ];

    let selection = Select::with_theme(&ColorfulTheme::default())
        .with_prompt("請選擇功能")
        .items(&options)
        .default(0)
        .interact_on_opt(term)?;

    match selection {
        Some(0) => {
            run_manual_cut(term, config, codec)?;
            Ok(true)
        }
        Some(1) => {
            run_scene_cut(term, config, codec)?;
            Ok(true)
        }
        Some(2) => {
            show_output_format_menu(term, config)?;
            Ok(true)
        }
        Some(3) | None => Ok(false), // ESC pressed - exit
        _ => unreachable!(),
    }
}

/// 輸出格式設定選單
fn show_output_format_menu(term: &Term, config: &mut Config) -> Result<()> {
    term.clear_screen()?;

    println!("{}", style("=== 輸出格式 ===").cyan().bold());
    println!("{}", style("按 ESC 返回").dim());

    let current = config.settings.normalized_extension();
    println!("\n{} {}", style("目前設定:").dim(), current);
    println!();

    let default_index = OUTPUT_EXTENSIONS
        .iter()
        .position(|&ext| ext == current)
        .unwrap_or(0);

    let selection = Select::with_theme(&ColorfulTheme::default())
        .with_prompt("請選擇輸出格式")
        .items(&OUTPUT_EXTENSIONS)
        .default(default_index)
        .interact_on_opt(term)?;

    // ESC pressed - return without saving
    let Some(selection) = selection else {
        return Ok(());
    };

    let selected = OUTPUT_EXTENSIONS[selection];
    if selected != current {
        config.settings.output_extension = selected.to_string();
        save_settings(&config.settings)?;
        println!("\n{} {}", style("已儲存:").green(), selected);
        std::thread::sleep(std::time::Duration::from_secs(1));
    }

    Ok(())
}
