macro_rules! impl_client_new {
    ($client_name:ident) => {
        impl $client_name {
            pub fn new(
                transport: crate::transport::TransportClient,
                classifier: std::sync::Arc<dyn crate::classifier::ErrorClassifier>,
            ) -> Self {
                Self { transport, classifier }
            }
        }
    };
}

macro_rules! impl_list_method {
    ($client_name:ident, $entity:ty, $path:expr, $collection_snake:ident) => {
        paste::paste! {
            impl $client_name {
                #[tracing::instrument(skip(self))]
                pub async fn [<list_ $collection_snake>](
                    &self,
                ) -> Result<Vec<$entity>, crate::classifier::ClassifiedError> {
                    tracing::debug!("Sending request");
                    crate::clients::exchange(
                        &self.transport,
                        self.classifier.as_ref(),
                        crate::transport::ApiRequest::get($path),
                    )
                    .await
                }
            }
        }
    };
}

macro_rules! impl_basic_client {
    ($client_name:ident, $entity:ty, $path:expr, $collection_snake:ident) => {
        impl_client_new!($client_name);
        impl_list_method!($client_name, $entity, $path, $collection_snake);
    };
}
