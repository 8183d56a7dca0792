//! User-facing texts in each supported language.
//!
//! Texts use Telegram's legacy Markdown: `*bold*`, `` `code` ``.

use rust_decimal::{Decimal, RoundingStrategy};

use crate::config::Locale;
use crate::models::{Direction, TradeOffer};
use crate::trading::PositionSize;

/// Message catalogue for one locale.
#[derive(Debug, Clone)]
pub struct Messages {
    locale: Locale,
    support_username: Option<String>,
}

impl Messages {
    pub fn new(locale: Locale, support_username: Option<String>) -> Self {
        Self {
            locale,
            support_username: support_username.filter(|s| !s.is_empty()),
        }
    }

    pub fn welcome(&self, needs_setup: bool) -> String {
        let mut text = match self.locale {
            Locale::Ru => "Привет трейдер. \nБот поможет тебе определиться с объёмом сделки \
                 в зависимости от твоего депозита и процента риска."
                .to_string(),
            Locale::En => "Hi trader. \nThis bot helps you pick a position size \
                 based on your deposit and risk percentage."
                .to_string(),
        };

        if needs_setup {
            text += match self.locale {
                Locale::Ru => "\nДля начала давай укажем процент риска.",
                Locale::En => "\nLet's start by setting your risk percentage.",
            };
        }
        text
    }

    pub fn risk_prompt(&self, current: Decimal) -> String {
        match self.locale {
            Locale::Ru => format!(
                "Твой текущий процент риска: *{:.2}*%.\n\nУкажи новый процент",
                rounded(current, 2)
            ),
            Locale::En => format!(
                "Your current risk percentage: *{:.2}*%.\n\nSend me the new percentage",
                rounded(current, 2)
            ),
        }
    }

    pub fn risk_updated(&self) -> &'static str {
        match self.locale {
            Locale::Ru => "Ваш процент обновлен.",
            Locale::En => "Your risk percentage has been updated.",
        }
    }

    /// Prompt shown whenever the bot has nothing else to ask for.
    pub fn send_signal(&self) -> &'static str {
        match self.locale {
            Locale::Ru => {
                "Отправь мне сообщение из канала CRYPTO-ANGEL и я подскажу с объёмом сделки"
            }
            Locale::En => {
                "Forward me a message from the CRYPTO-ANGEL channel and I'll suggest a position size"
            }
        }
    }

    pub fn deposit_prompt(&self) -> &'static str {
        match self.locale {
            Locale::Ru => "Укажите размер депозита",
            Locale::En => "Send me your deposit size",
        }
    }

    pub fn invalid_number(&self) -> &'static str {
        match self.locale {
            Locale::Ru => "Неверный формат данных, должно быть число",
            Locale::En => "Invalid format, expected a number",
        }
    }

    pub fn unrecognized_signal(&self) -> &'static str {
        match self.locale {
            Locale::Ru => "Не удалось разобрать сигнал. Перешли сообщение из канала целиком",
            Locale::En => "Could not understand this signal. Forward the whole channel message",
        }
    }

    pub fn unusable_signal(&self) -> &'static str {
        match self.locale {
            Locale::Ru => "В сигнале нулевые цены или стоп, посчитать объём нельзя",
            Locale::En => "The signal has a zero price or stop, the size cannot be calculated",
        }
    }

    pub fn internal_error(&self) -> String {
        let (base, contact) = match self.locale {
            Locale::Ru => ("Что то пошло не так, попробуйте снова", " или обратитесь в чат @"),
            Locale::En => ("Something went wrong, please try again", " or contact @"),
        };

        match &self.support_username {
            Some(support) => format!("{}{}{}", base, contact, support),
            None => base.to_string(),
        }
    }

    pub fn sizing_result(&self, offer: &TradeOffer, size: &PositionSize) -> String {
        let (heading, funds, tokens, entry) = match self.locale {
            Locale::Ru => (
                "Для открытия позиции",
                "Объём средств",
                "Кол-во токенов (с риском",
                "При цене входа",
            ),
            Locale::En => (
                "To open the position",
                "Position volume",
                "Token amount (at risk",
                "At entry price",
            ),
        };

        let direction = match (self.locale, offer.direction) {
            (Locale::Ru, Some(Direction::Long)) => " в лонг",
            (Locale::Ru, Some(Direction::Short)) => " в шорт",
            (Locale::En, Some(Direction::Long)) => " (long)",
            (Locale::En, Some(Direction::Short)) => " (short)",
            (_, None) => "",
        };

        let mut text = String::new();
        text += &format!("{}{} \n\n", heading, direction);
        text += &format!("{}: *${:.2}*\n\n", funds, rounded(size.position_volume, 2));
        text += &format!("{} *{:.2}%*):\n\n", tokens, rounded(size.risk_percentage, 2));
        text += &format!(
            "{} *${:.2}*:  *{}* `{:.4}`\n",
            entry,
            rounded(offer.max_range_price, 2),
            offer.crypto_code,
            rounded(size.min_token_volume, 4)
        );
        text += &format!(
            "{} *${:.2}*:  *{}* `{:.4}`",
            entry,
            rounded(offer.min_range_price, 2),
            offer.crypto_code,
            rounded(size.max_token_volume, 4)
        );
        text
    }
}

/// Decimal's `{:.N}` truncates, replies round half away from zero.
fn rounded(value: Decimal, dp: u32) -> Decimal {
    value.round_dp_with_strategy(dp, RoundingStrategy::MidpointAwayFromZero)
}
