//! Reusable GraphQL fragments.
//!
//! Operation documents are assembled with [`collect_dependencies`], which
//! appends every fragment the operation spreads, transitively, exactly once.

/// A named GraphQL fragment and the fragments it spreads.
#[derive(Debug)]
pub struct Fragment {
    /// Fragment name as spread in documents.
    pub name: &'static str,
    /// Full `fragment ... on ... { }` text.
    pub body: &'static str,
    /// Fragments spread by `body`.
    pub dependencies: &'static [&'static Fragment],
}

/// Build a document from an operation and the fragments it spreads.
///
/// Dependencies come before their dependents; each fragment appears once.
#[must_use]
pub fn collect_dependencies(operation: &str, fragments: &[&Fragment]) -> String {
    fn visit<'a>(fragment: &'a Fragment, seen: &mut Vec<&'a str>, out: &mut Vec<&'a str>) {
        if seen.contains(&fragment.name) {
            return;
        }
        seen.push(fragment.name);
        for dep in fragment.dependencies {
            visit(dep, seen, out);
        }
        out.push(fragment.body);
    }

    let mut seen = Vec::new();
    let mut bodies = Vec::new();
    for fragment in fragments {
        visit(fragment, &mut seen, &mut bodies);
    }
    bodies.push(operation);
    bodies.join("\n")
}

/// `Authorization` fields.
pub static AUTHORIZATION: Fragment = Fragment {
    name: "AuthorizationFragment",
    body: r"fragment AuthorizationFragment on Authorization {
  token
  expiry
}",
    dependencies: &[],
};

/// `User` fields returned by login mutations.
pub static USER: Fragment = Fragment {
    name: "UserFragment",
    body: r"fragment UserFragment on User {
  email
  emailConfirmed
  authorization {
    ...AuthorizationFragment
  }
  roles
}",
    dependencies: &[&AUTHORIZATION],
};

/// `EmailTarget` fields.
pub static EMAIL_TARGET: Fragment = Fragment {
    name: "EmailTargetFragment",
    body: r"fragment EmailTargetFragment on EmailTarget {
  id
  emailAddress
  name
  isConfirmed
}",
    dependencies: &[],
};

/// `SmsTarget` fields.
pub static SMS_TARGET: Fragment = Fragment {
    name: "SmsTargetFragment",
    body: r"fragment SmsTargetFragment on SmsTarget {
  id
  isConfirmed
  name
  phoneNumber
}",
    dependencies: &[],
};

/// `TelegramTarget` fields.
pub static TELEGRAM_TARGET: Fragment = Fragment {
    name: "TelegramTargetFragment",
    body: r"fragment TelegramTargetFragment on TelegramTarget {
  id
  isConfirmed
  name
  telegramId
  confirmationUrl
}",
    dependencies: &[],
};

/// `WebhookTarget` fields.
pub static WEBHOOK_TARGET: Fragment = Fragment {
    name: "WebhookTargetFragment",
    body: r"fragment WebhookTargetFragment on WebhookTarget {
  id
  name
  url
  format
  headers {
    key
    value
  }
}",
    dependencies: &[],
};

/// `DiscordTarget` fields.
pub static DISCORD_TARGET: Fragment = Fragment {
    name: "DiscordTargetFragment",
    body: r"fragment DiscordTargetFragment on DiscordTarget {
  id
  name
  discordAccountId
  discriminator
  isConfirmed
  username
  verificationLink
  userStatus
}",
    dependencies: &[],
};

/// `TargetGroup` fields with every target kind.
pub static TARGET_GROUP: Fragment = Fragment {
    name: "TargetGroupFragment",
    body: r"fragment TargetGroupFragment on TargetGroup {
  id
  name
  emailTargets {
    ...EmailTargetFragment
  }
  smsTargets {
    ...SmsTargetFragment
  }
  telegramTargets {
    ...TelegramTargetFragment
  }
  webhookTargets {
    ...WebhookTargetFragment
  }
  discordTargets {
    ...DiscordTargetFragment
  }
}",
    dependencies: &[
        &EMAIL_TARGET,
        &SMS_TARGET,
        &TELEGRAM_TARGET,
        &WEBHOOK_TARGET,
        &DISCORD_TARGET,
    ],
};

/// `Filter` fields.
pub static FILTER: Fragment = Fragment {
    name: "FilterFragment",
    body: r"fragment FilterFragment on Filter {
  id
  name
  filterType
}",
    dependencies: &[],
};

/// `Source` fields with applicable filters.
pub static SOURCE: Fragment = Fragment {
    name: "SourceFragment",
    body: r"fragment SourceFragment on Source {
  id
  name
  type
  blockchainAddress
  fusionEventTypeId
  applicableFilters {
    ...FilterFragment
  }
}",
    dependencies: &[&FILTER],
};

/// `SourceGroup` fields.
pub static SOURCE_GROUP: Fragment = Fragment {
    name: "SourceGroupFragment",
    body: r"fragment SourceGroupFragment on SourceGroup {
  id
  name
  sources {
    ...SourceFragment
  }
}",
    dependencies: &[&SOURCE],
};

/// `Alert` fields with its groups and filter.
pub static ALERT: Fragment = Fragment {
    name: "AlertFragment",
    body: r"fragment AlertFragment on Alert {
  id
  groupName
  name
  filterOptions
  filter {
    ...FilterFragment
  }
  sourceGroup {
    ...SourceGroupFragment
  }
  targetGroup {
    ...TargetGroupFragment
  }
}",
    dependencies: &[&FILTER, &SOURCE_GROUP, &TARGET_GROUP],
};

/// `ConnectedWallet` fields.
pub static CONNECTED_WALLET: Fragment = Fragment {
    name: "ConnectedWalletFragment",
    body: r"fragment ConnectedWalletFragment on ConnectedWallet {
  address
  walletBlockchain
}",
    dependencies: &[],
};

/// Relay `PageInfo` fields.
pub static PAGE_INFO: Fragment = Fragment {
    name: "PageInfoFragment",
    body: r"fragment PageInfoFragment on PageInfo {
  hasNextPage
  endCursor
}",
    dependencies: &[],
};

/// Notification history entry with every detail variant.
pub static NOTIFICATION_HISTORY_ENTRY: Fragment = Fragment {
    name: "NotificationHistoryEntryFragment",
    body: r"fragment NotificationHistoryEntryFragment on NotificationHistoryEntry {
  id
  createdDate
  eventId
  read
  sourceAddress
  category
  transactionSignature
  targets {
    type
    name
  }
  detail {
    __typename
    ... on AccountBalanceChangedEventDetails {
      walletBlockchain
      direction
      newValue
      previousValue
      tokenSymbol
      isWhaleWatch
    }
    ... on BroadcastMessageEventDetails {
      messageType: type
      subject
      message
    }
    ... on DirectTenantMessageEventDetails {
      tenantName
    }
    ... on NftCollectionsReportEventDetails {
      type
      providerName
      sourceLink
      collections {
        collectionId
        name
        imgUrl
        volume1Day
        volume1DayChange
      }
    }
    ... on ChatMessageReceivedEventDetails {
      senderName
      conversationId
      messageId
      senderId
      senderBlockchain
      messageBody
    }
    ... on DAOProposalChangedEventDetails {
      tenantName
      proposalTitle: title
      description
      state
      daoUrl
      proposalUrl
    }
    ... on NftAuctionChangedEventDetails {
      auctionTitle: title
      auctionUrl
      walletBlockchain
      highBidAmount
      highBidSymbol
      imageUrl
    }
    ... on WalletsActivityReportEventDetails {
      providerName
      sourceLink
      walletActivityType: type
      wallets {
        address
        volume1Day
        maxPurchase1Day
        maxPurchaseName
        maxPurchaseImgUrl
        maxPurchaseTokenAddress
      }
    }
    ... on HealthValueOverThresholdEventDetails {
      name
      value
      threshold
      url
    }
    ... on GenericEventDetails {
      sourceName
      notificationTypeName
      genericMessage: message
      action {
        name
        url
      }
      icon
    }
  }
}",
    dependencies: &[],
};

/// `TenantConfig` fields.
pub static TENANT_CONFIG: Fragment = Fragment {
    name: "TenantConfigFragment",
    body: r"fragment TenantConfigFragment on TenantConfig {
  id
  type
  dataJson
}",
    dependencies: &[],
};

/// `UserTopic` fields.
pub static USER_TOPIC: Fragment = Fragment {
    name: "UserTopicFragment",
    body: r"fragment UserTopicFragment on UserTopic {
  name
  topicName
  targetCollections
  targetTemplate
}",
    dependencies: &[],
};

/// Conversation participant fields.
pub static PARTICIPANT: Fragment = Fragment {
    name: "ParticipantFragment",
    body: r"fragment ParticipantFragment on Participant {
  conversationId
  conversationParticipantType
  resolvedName
  userId
  walletAddress
  walletBlockchain
  profile {
    id
    avatarData
    avatarDataType
    preferredAddress
    preferredBlockchain
    preferredName
  }
}",
    dependencies: &[],
};

/// Conversation message fields.
pub static CONVERSATION_MESSAGE: Fragment = Fragment {
    name: "ConversationMessageFragment",
    body: r"fragment ConversationMessageFragment on ConversationMessage {
  id
  conversationId
  userId
  message
  createdDate
  userProfile {
    id
    avatarData
    avatarDataType
    preferredAddress
    preferredBlockchain
    preferredName
  }
}",
    dependencies: &[],
};

/// Support conversation fields.
pub static SUPPORT_CONVERSATION: Fragment = Fragment {
    name: "SupportConversationFragment",
    body: r"fragment SupportConversationFragment on SupportConversation {
  id
  conversationType
  conversationGates {
    id
  }
  name
  createdDate
  backgroundImageUrl
  participants {
    ...ParticipantFragment
  }
}",
    dependencies: &[&PARTICIPANT],
};

/// Tenant-side view of a user.
pub static TENANT_USER: Fragment = Fragment {
    name: "TenantUserFragment",
    body: r"fragment TenantUserFragment on TenantUser {
  id
  alerts {
    id
    filterType
    filterOptions
    groupName
    name
  }
  connectedWallets {
    ...ConnectedWalletFragment
  }
}",
    dependencies: &[&CONNECTED_WALLET],
};

/// Tenant-side view of a connected wallet.
pub static TENANT_CONNECTED_WALLET: Fragment = Fragment {
    name: "TenantConnectedWalletFragment",
    body: r"fragment TenantConnectedWalletFragment on TenantConnectedWallet {
  address
  walletBlockchain
  user {
    id
  }
}",
    dependencies: &[],
};
