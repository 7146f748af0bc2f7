//! Support conversations.

use serde::Serialize;

use super::{NoVariables, operation};
use crate::fragments::{CONVERSATION_MESSAGE, PAGE_INFO, SUPPORT_CONVERSATION};
use crate::models::{ConversationMessage, ConversationMessages, SupportConversation};

/// Conversation addressed by [`GetConversationMessages`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversationMessagesInput {
    /// Conversation.
    pub conversation_id: String,
}

/// Variables of [`GetConversationMessages`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GetConversationMessagesVariables {
    /// Page size.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first: Option<u32>,
    /// Cursor to continue after.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub after: Option<String>,
    /// Conversation.
    pub input: ConversationMessagesInput,
}

operation! {
    /// Page through the messages of a conversation.
    GetConversationMessages {
        name: "getConversationMessages",
        root: "conversationMessages",
        variables: GetConversationMessagesVariables,
        response: Option<ConversationMessages>,
        fragments: [PAGE_INFO, CONVERSATION_MESSAGE],
        document: r"query getConversationMessages(
  $first: Int
  $after: String
  $input: GetConversationMessagesFullInput!
) {
  conversationMessages(first: $first, after: $after, getConversationMessagesInput: $input) {
    pageInfo {
      ...PageInfoFragment
    }
    nodes {
      ...ConversationMessageFragment
    }
  }
}",
    }
}

/// Message posted by [`SendConversationMessage`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SendConversationMessageInput {
    /// Conversation.
    pub conversation_id: String,
    /// Body.
    pub message: String,
}

/// Variables of [`SendConversationMessage`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SendConversationMessageVariables {
    /// Message.
    pub send_conversation_message_input: SendConversationMessageInput,
}

operation! {
    /// Post a message to a conversation.
    SendConversationMessage {
        name: "sendConversationMessage",
        root: "sendConversationMessage",
        variables: SendConversationMessageVariables,
        response: Option<ConversationMessage>,
        fragments: [CONVERSATION_MESSAGE],
        document: r"mutation sendConversationMessage(
  $sendConversationMessageInput: SendConversationMessageInput!
) {
  sendConversationMessage(sendConversationMessageInput: $sendConversationMessageInput) {
    ...ConversationMessageFragment
  }
}",
    }
}

operation! {
    /// Open a conversation with tenant support.
    CreateSupportConversation {
        name: "createSupportConversation",
        root: "createSupportConversation",
        variables: NoVariables,
        response: Option<SupportConversation>,
        fragments: [SUPPORT_CONVERSATION],
        document: r"mutation createSupportConversation {
  createSupportConversation {
    ...SupportConversationFragment
  }
}",
    }
}
