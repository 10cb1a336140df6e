//! Downward interface to the NAN hardware abstraction layer.

use bytes::Bytes;

use crate::core::{
    ConfigRequest, MacAddress, PeerId, PubSubId, PublishConfig, SubscribeConfig, TransactionId,
};

/// Commands the manager issues to the discovery firmware.
///
/// Every call returns immediately; the firmware answers later through the
/// manager's event surface, correlated by transaction id. A `None`
/// publish/subscribe id means "create a new session" (wire value 0).
///
/// A production implementation wraps the vendor HAL; tests substitute a
/// recording fake.
pub trait NanHal: Send + Sync {
    fn enable_and_configure(&self, tx: TransactionId, config: &ConfigRequest);

    fn disable(&self, tx: TransactionId);

    fn publish(&self, tx: TransactionId, pub_sub_id: Option<PubSubId>, config: &PublishConfig);

    fn stop_publish(&self, tx: TransactionId, pub_sub_id: PubSubId);

    fn subscribe(&self, tx: TransactionId, pub_sub_id: Option<PubSubId>, config: &SubscribeConfig);

    fn stop_subscribe(&self, tx: TransactionId, pub_sub_id: PubSubId);

    fn send_message(
        &self,
        tx: TransactionId,
        pub_sub_id: PubSubId,
        peer: PeerId,
        peer_mac: MacAddress,
        payload: &Bytes,
    );
}
