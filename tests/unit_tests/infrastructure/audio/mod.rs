mod openai_whisper_engine_test;
