use host_ipc::{ConfigRecord, HOST_ID_KEY, XMPP_LOGIN_KEY};

/// `true` iff the record exists and both `host_id` and `xmpp_login` are
/// strings. Anything else means "no host registered".
pub fn is_host_config_valid(record: Option<&ConfigRecord>) -> bool {
    LocalHostConfig::from_record(record).is_some()
}

/// The parts of a valid local record the controller relies on.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LocalHostConfig {
    pub host_id: String,
    pub xmpp_login: String,
}

impl LocalHostConfig {
    pub fn from_record(record: Option<&ConfigRecord>) -> Option<Self> {
        let record = record?;
        Some(Self {
            host_id: record.str_field(HOST_ID_KEY)?.to_string(),
            xmpp_login: record.str_field(XMPP_LOGIN_KEY)?.to_string(),
        })
    }
}
