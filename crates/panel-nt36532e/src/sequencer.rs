//! Command sequencer
//!
//! Replays a vendor command table over the primary link and takes the
//! controller out of sleep. Any failed write aborts the sequence; nothing is
//! retried.

use embedded_hal_async::delay::DelayNs;
use platform::{DsiDevice, DsiError};

use crate::config::SLEEP_OUT_DELAY_MS;
use crate::init_sequence::{CommandPage, PAGE_SELECT, RELOAD_CTRL, RELOAD_DISABLE};

/// Select `page`, lock it against MTP reload, then apply its writes.
pub async fn send_page<D: DsiDevice>(dsi: &mut D, page: &CommandPage) -> Result<(), DsiError> {
    trace!("page {:x} ({})", page.page, page.name);
    dsi.dcs_write(PAGE_SELECT, &[page.page]).await?;
    dsi.dcs_write(RELOAD_CTRL, &[RELOAD_DISABLE]).await?;
    for w in page.writes {
        dsi.dcs_write(w.addr, w.data).await?;
    }
    Ok(())
}

/// Send every page of `table` in order.
pub async fn send_table<D: DsiDevice>(dsi: &mut D, table: &[CommandPage]) -> Result<(), DsiError> {
    for page in table {
        send_page(dsi, page).await?;
    }
    Ok(())
}

/// Full bring-up: vendor table, exit sleep, settle, display on.
pub async fn init<D, DELAY>(
    dsi: &mut D,
    delay: &mut DELAY,
    table: &[CommandPage],
) -> Result<(), DsiError>
where
    D: DsiDevice,
    DELAY: DelayNs,
{
    send_table(dsi, table).await?;

    if let Err(e) = dsi.exit_sleep_mode().await {
        error!("failed to exit sleep mode: {}", e);
        return Err(e);
    }

    delay.delay_ms(SLEEP_OUT_DELAY_MS).await;

    if let Err(e) = dsi.set_display_on().await {
        error!("failed to set display on: {}", e);
        return Err(e);
    }

    Ok(())
}
