//! Destinations and target groups.

use serde::Serialize;

use super::{IdVariables, NoVariables, NullableList, operation};
use crate::fragments::{
    DISCORD_TARGET, EMAIL_TARGET, SMS_TARGET, TARGET_GROUP, TELEGRAM_TARGET, WEBHOOK_TARGET,
};
use crate::models::{
    DiscordTarget, EmailTarget, IdResult, KeyValuePair, SmsTarget, TargetGroup, TelegramTarget,
    WebhookPayloadFormat, WebhookTarget,
};

/// Variables of the simple `create*Target` mutations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CreateTargetVariables {
    /// Target name.
    pub name: String,
    /// Address, number or handle.
    pub value: String,
}

impl CreateTargetVariables {
    /// Target whose name is its value.
    #[must_use]
    pub fn named_after(value: impl Into<String>) -> Self {
        let value = value.into();
        Self {
            name: value.clone(),
            value,
        }
    }
}

operation! {
    /// List email targets.
    GetEmailTargets {
        name: "getEmailTargets",
        root: "emailTarget",
        variables: NoVariables,
        response: NullableList<EmailTarget>,
        fragments: [EMAIL_TARGET],
        document: r"query getEmailTargets {
  emailTarget {
    ...EmailTargetFragment
  }
}",
    }
}

operation! {
    /// Create an email target.
    CreateEmailTarget {
        name: "createEmailTarget",
        root: "createEmailTarget",
        variables: CreateTargetVariables,
        response: Option<EmailTarget>,
        fragments: [EMAIL_TARGET],
        document: r"mutation createEmailTarget($name: String!, $value: String!) {
  createEmailTarget(createTargetInput: { name: $name, value: $value }) {
    ...EmailTargetFragment
  }
}",
    }
}

operation! {
    /// List SMS targets.
    GetSmsTargets {
        name: "getSmsTargets",
        root: "smsTarget",
        variables: NoVariables,
        response: NullableList<SmsTarget>,
        fragments: [SMS_TARGET],
        document: r"query getSmsTargets {
  smsTarget {
    ...SmsTargetFragment
  }
}",
    }
}

operation! {
    /// Create an SMS target.
    CreateSmsTarget {
        name: "createSmsTarget",
        root: "createSmsTarget",
        variables: CreateTargetVariables,
        response: Option<SmsTarget>,
        fragments: [SMS_TARGET],
        document: r"mutation createSmsTarget($name: String!, $value: String!) {
  createSmsTarget(createTargetInput: { name: $name, value: $value }) {
    ...SmsTargetFragment
  }
}",
    }
}

operation! {
    /// List Telegram targets.
    GetTelegramTargets {
        name: "getTelegramTargets",
        root: "telegramTarget",
        variables: NoVariables,
        response: NullableList<TelegramTarget>,
        fragments: [TELEGRAM_TARGET],
        document: r"query getTelegramTargets {
  telegramTarget {
    ...TelegramTargetFragment
  }
}",
    }
}

operation! {
    /// Create a Telegram target.
    CreateTelegramTarget {
        name: "createTelegramTarget",
        root: "createTelegramTarget",
        variables: CreateTargetVariables,
        response: Option<TelegramTarget>,
        fragments: [TELEGRAM_TARGET],
        document: r"mutation createTelegramTarget($name: String!, $value: String!) {
  createTelegramTarget(createTargetInput: { name: $name, value: $value }) {
    ...TelegramTargetFragment
  }
}",
    }
}

/// Variables of [`CreateWebhookTarget`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CreateWebhookTargetVariables {
    /// Target name.
    pub name: String,
    /// Destination URL.
    pub url: String,
    /// Payload format.
    pub format: WebhookPayloadFormat,
    /// Headers sent with each call.
    pub headers: Vec<KeyValuePair>,
}

operation! {
    /// List webhook targets.
    GetWebhookTargets {
        name: "getWebhookTargets",
        root: "webhookTarget",
        variables: NoVariables,
        response: NullableList<WebhookTarget>,
        fragments: [WEBHOOK_TARGET],
        document: r"query getWebhookTargets {
  webhookTarget {
    ...WebhookTargetFragment
  }
}",
    }
}

operation! {
    /// Create a webhook target.
    CreateWebhookTarget {
        name: "createWebhookTarget",
        root: "createWebhookTarget",
        variables: CreateWebhookTargetVariables,
        response: Option<WebhookTarget>,
        fragments: [WEBHOOK_TARGET],
        document: r"mutation createWebhookTarget(
  $name: String!
  $url: String!
  $format: WebhookPayloadFormat!
  $headers: [KeyValuePairOfStringAndStringInput!]!
) {
  createWebhookTarget(
    createTargetInput: { name: $name, url: $url, format: $format, headers: $headers }
  ) {
    ...WebhookTargetFragment
  }
}",
    }
}

operation! {
    /// Delete a webhook target.
    DeleteWebhookTarget {
        name: "deleteWebhookTarget",
        root: "deleteWebhookTarget",
        variables: IdVariables,
        response: Option<IdResult>,
        fragments: [],
        document: r"mutation deleteWebhookTarget($id: String!) {
  deleteWebhookTarget(deleteTargetInput: { id: $id }) {
    id
  }
}",
    }
}

operation! {
    /// List Discord targets.
    GetDiscordTargets {
        name: "getDiscordTargets",
        root: "discordTarget",
        variables: NoVariables,
        response: NullableList<DiscordTarget>,
        fragments: [DISCORD_TARGET],
        document: r"query getDiscordTargets {
  discordTarget {
    ...DiscordTargetFragment
  }
}",
    }
}

operation! {
    /// Create a Discord target.
    CreateDiscordTarget {
        name: "createDiscordTarget",
        root: "createDiscordTarget",
        variables: CreateTargetVariables,
        response: Option<DiscordTarget>,
        fragments: [DISCORD_TARGET],
        document: r"mutation createDiscordTarget($name: String!, $value: String!) {
  createDiscordTarget(createTargetInput: { name: $name, value: $value }) {
    ...DiscordTargetFragment
  }
}",
    }
}

/// Variables of [`SendEmailTargetVerificationRequest`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TargetIdVariables {
    /// Target to verify.
    pub target_id: String,
}

operation! {
    /// Resend the confirmation email of a target.
    SendEmailTargetVerificationRequest {
        name: "sendEmailTargetVerificationRequest",
        root: "sendEmailTargetVerificationRequest",
        variables: TargetIdVariables,
        response: Option<IdResult>,
        fragments: [],
        document: r"mutation sendEmailTargetVerificationRequest($targetId: String!) {
  sendEmailTargetVerificationRequest(
    sendTargetConfirmationRequestInput: { targetId: $targetId }
  ) {
    id
  }
}",
    }
}

/// Target IDs making up a group.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TargetIds {
    /// Email targets.
    pub email_target_ids: Vec<String>,
    /// SMS targets.
    pub sms_target_ids: Vec<String>,
    /// Telegram targets.
    pub telegram_target_ids: Vec<String>,
    /// Webhook targets.
    pub webhook_target_ids: Vec<String>,
    /// Discord targets.
    pub discord_target_ids: Vec<String>,
}

/// Variables of [`CreateTargetGroup`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CreateTargetGroupVariables {
    /// Group name.
    pub name: String,
    /// Member targets.
    #[serde(flatten)]
    pub targets: TargetIds,
}

/// Variables of [`UpdateTargetGroup`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UpdateTargetGroupVariables {
    /// Group to update.
    pub id: String,
    /// New name.
    pub name: String,
    /// Replacement member targets.
    #[serde(flatten)]
    pub targets: TargetIds,
}

operation! {
    /// List target groups.
    GetTargetGroups {
        name: "getTargetGroups",
        root: "targetGroup",
        variables: NoVariables,
        response: NullableList<TargetGroup>,
        fragments: [TARGET_GROUP],
        document: r"query getTargetGroups {
  targetGroup {
    ...TargetGroupFragment
  }
}",
    }
}

operation! {
    /// Create a target group.
    CreateTargetGroup {
        name: "createTargetGroup",
        root: "createTargetGroup",
        variables: CreateTargetGroupVariables,
        response: Option<TargetGroup>,
        fragments: [TARGET_GROUP],
        document: r"mutation createTargetGroup(
  $name: String!
  $emailTargetIds: [String!]!
  $smsTargetIds: [String!]!
  $telegramTargetIds: [String!]!
  $webhookTargetIds: [String!]!
  $discordTargetIds: [String!]!
) {
  createTargetGroup(
    targetGroupInput: {
      name: $name
      emailTargetIds: $emailTargetIds
      smsTargetIds: $smsTargetIds
      telegramTargetIds: $telegramTargetIds
      webhookTargetIds: $webhookTargetIds
      discordTargetIds: $discordTargetIds
    }
  ) {
    ...TargetGroupFragment
  }
}",
    }
}

operation! {
    /// Replace the members of a target group.
    UpdateTargetGroup {
        name: "updateTargetGroup",
        root: "updateTargetGroup",
        variables: UpdateTargetGroupVariables,
        response: Option<TargetGroup>,
        fragments: [TARGET_GROUP],
        document: r"mutation updateTargetGroup(
  $id: String!
  $name: String!
  $emailTargetIds: [String!]!
  $smsTargetIds: [String!]!
  $telegramTargetIds: [String!]!
  $webhookTargetIds: [String!]!
  $discordTargetIds: [String!]!
) {
  updateTargetGroup(
    targetGroupInput: {
      id: $id
      name: $name
      emailTargetIds: $emailTargetIds
      smsTargetIds: $smsTargetIds
      telegramTargetIds: $telegramTargetIds
      webhookTargetIds: $webhookTargetIds
      discordTargetIds: $discordTargetIds
    }
  ) {
    ...TargetGroupFragment
  }
}",
    }
}

operation! {
    /// Delete a target group.
    DeleteTargetGroup {
        name: "deleteTargetGroup",
        root: "deleteTargetGroup",
        variables: IdVariables,
        response: Option<IdResult>,
        fragments: [],
        document: r"mutation deleteTargetGroup($id: String!) {
  deleteTargetGroup(targetGroupInput: { id: $id }) {
    id
  }
}",
    }
}
