use common::{Side, Signal};

const RULE: &str = "━━━━━━━━━━━━━━━━━━━";

pub const STARTUP_MESSAGE: &str =
    "🚀 *Automatic signal bot started* 🚀\nWatching the market and sending signals automatically...";

pub const SHUTDOWN_MESSAGE: &str = "🛑 *Automatic signal bot stopped*";

/// Render a signal as a Telegram Markdown message.
pub fn render_signal(signal: &Signal, pair: &str) -> String {
    let direction = match signal.side {
        Side::Buy => "🟢⬆️",
        Side::Sell => "🔴⬇️",
    };
    let ind = &signal.indicators;
    let (ema_label, ema_arrow) = if ind.above_ema {
        ("Above EMA50", "▲")
    } else {
        ("Below EMA50", "▼")
    };
    let hours = signal.validity().num_hours();

    let mut msg = String::new();
    msg.push_str("⚡️ *New Trading Signal* ⚡️\n");
    msg.push_str(RULE);
    msg.push('\n');
    msg.push_str(&format!("🪙 *Pair:* {pair}\n"));
    msg.push_str(&format!("💹 *Side:* {} {direction}\n", signal.side));
    msg.push_str(&format!("💰 *Entry:* {:.4}\n\n", signal.entry_price));

    msg.push_str("💸 *Targets:*\n");
    msg.push_str(&format!("   🎯 *Target 1:* {:.4}\n", signal.take_profit_1));
    msg.push_str(&format!("   🎯 *Target 2:* {:.4}\n", signal.take_profit_2));
    msg.push_str(&format!("   ⛔️ *Stop loss:* {:.4}\n\n", signal.stop_loss));

    msg.push_str("📊 *Indicators:*\n");
    msg.push_str(&format!("   📈 *RSI (14):* {:.2}\n", ind.rsi));
    msg.push_str(&format!("   📉 *MACD (12,26,9):* {:.4}\n", ind.macd_histogram));
    msg.push_str(&format!("   📊 *EMA:* {ema_label} {ema_arrow}\n"));
    msg.push_str(&format!("✅ *Confidence:* {:.1}%\n\n", signal.confidence));

    msg.push_str(&format!(
        "⏱ *Time (UTC):* {}\n",
        signal.created_at.format("%H:%M:%S %d/%m/%Y")
    ));
    msg.push_str(&format!(
        "⌛️ *Expires (UTC):* {}\n",
        signal.expires_at.format("%H:%M:%S")
    ));
    msg.push_str(&format!("⏳ *Validity:* {hours} hours\n"));
    msg.push_str(RULE);
    msg.push('\n');
    msg.push_str("🤖 *Elite Signal Bot* | automatic delivery");
    msg
}
