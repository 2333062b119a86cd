use super::AppContext;
use crate::core::prefs::Theme;
use anyhow::Result;

pub async fn run(ctx: &AppContext, toggle: bool, set: Option<Theme>) -> Result<()> {
    let theme = match (set, toggle) {
        (Some(theme), _) => theme,
        (None, true) => ctx.theme.toggled(),
        (None, false) => {
            println!("Theme: {}", ctx.theme);
            return Ok(());
        }
    };

    ctx.store().save_theme(theme).await;
    println!("Theme set to {theme}");
    Ok(())
}
