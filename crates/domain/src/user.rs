//! # ユーザー
//!
//! ユーザーディレクトリから読み取るユーザーレコードと、通知対象を選ぶ受信者フィルタを定義する。
//!
//! ## 設計方針
//!
//! - **読み取り専用**: [`UserRecord`] はこのシステムから変更されない
//! - **寛容なデコード**: ディレクトリのドキュメントはスキーマを強制されないため、
//!   欠損フィールドと `null` はデフォルト値で補う
//! - **フィルタは等価条件の論理積**: [`RecipientFilter`] は
//!   `pushNotifications == true AND profile == <role> [AND isActive == true]`

use serde::{Deserialize, Deserializer, Serialize};

/// ユーザーレコード
///
/// ディレクトリの `users` コレクションのドキュメント。フィールド名は camelCase。
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRecord {
    #[serde(default)]
    pub email:              Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub given_name:         String,
    /// 姓（任意）
    #[serde(default)]
    pub name:               Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub push_notifications: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    pub profile:            String,
    #[serde(default)]
    pub is_active:          Option<bool>,
}

/// `null` をデフォルト値として読む
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

impl UserRecord {
    /// 通知先メールアドレス
    ///
    /// 未設定または空白のみの場合は `None`（通知対象外）。
    pub fn notification_address(&self) -> Option<&str> {
        self.email
            .as_deref()
            .map(str::trim)
            .filter(|email| !email.is_empty())
    }

    /// 挨拶に使う表示名（名 + 任意の姓）
    pub fn display_name(&self) -> String {
        match self.name.as_deref().map(str::trim) {
            Some(surname) if !surname.is_empty() => {
                format!("{} {}", self.given_name.trim(), surname)
            }
            _ => self.given_name.trim().to_string(),
        }
    }
}

/// 受信者フィルタ
///
/// 週替わりオファーを受け取るユーザーを選ぶ条件。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecipientFilter {
    /// 対象とするプロフィール（顧客ロール）
    pub profile:        String,
    /// `isActive == true` を条件に含めるか
    pub require_active: bool,
}

impl RecipientFilter {
    /// 標準の顧客ロール
    pub const CUSTOMER_PROFILE: &'static str = "customer";
    /// 旧バージョンの顧客ロール
    pub const LEGACY_CLIENT_PROFILE: &'static str = "Client";

    pub fn new(profile: impl Into<String>, require_active: bool) -> Self {
        Self {
            profile: profile.into(),
            require_active,
        }
    }

    /// 標準のフィルタ（`customer` かつ有効なユーザー）
    pub fn active_customers() -> Self {
        Self::new(Self::CUSTOMER_PROFILE, true)
    }

    /// 旧バージョンのフィルタ（`Client`、有効フラグは見ない）
    pub fn legacy_clients() -> Self {
        Self::new(Self::LEGACY_CLIENT_PROFILE, false)
    }

    /// レコードがフィルタ条件を満たすか
    ///
    /// メールアドレスの有無はここでは判定しない。
    pub fn matches(&self, user: &UserRecord) -> bool {
        user.push_notifications
            && user.profile == self.profile
            && (!self.require_active || user.is_active == Some(true))
    }
}

impl Default for RecipientFilter {
    fn default() -> Self {
        Self::active_customers()
    }
}
