pub(crate) mod places_client;
